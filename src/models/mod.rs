pub mod coupon;
pub mod payment;
pub mod ticket;
pub mod user;

pub use coupon::{CouponCode, CouponValidationResult, DiscountType};
pub use payment::{PaymentIntent, PaymentProvider};
pub use ticket::{
    Currency, EventDates, Location, PackageType, PricingResult, TicketType, UserProfile, UserType,
};
pub use user::User;
