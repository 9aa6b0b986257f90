//! Registration-account authentication: argon2 password hashing over the
//! in-memory user store, HS256 JWTs for the session token.

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{errors::ServiceError, models::User, services::users::UserStore};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl: Duration,
    users: Arc<UserStore>,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_ttl: Duration, users: Arc<UserStore>) -> Self {
        Self {
            jwt_secret,
            token_ttl,
            users,
        }
    }

    pub fn register(
        &self,
        name: String,
        email: String,
        password: &str,
    ) -> Result<User, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::HashError(e.to_string()))?
            .to_string();
        let user = self.users.create(name, email, hash)?;
        info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(String, User), ServiceError> {
        let user = self
            .users
            .find_by_email(email)
            .ok_or_else(|| ServiceError::AuthError(INVALID_CREDENTIALS.to_string()))?;
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| ServiceError::AuthError(INVALID_CREDENTIALS.to_string()))?;
        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_ttl.as_secs() as i64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token encoding: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized("invalid or expired token".to_string()))
    }

    /// Extract and verify a `Bearer` token from an Authorization header
    /// value.
    pub fn authenticate_bearer(&self, header: &str) -> Result<Claims, ServiceError> {
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServiceError::Unauthorized("expected bearer token".to_string()))?;
        self.verify_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn service() -> AuthService {
        AuthService::new(
            "unit-test-secret-key-0123456789abcdef".to_string(),
            Duration::from_secs(3600),
            Arc::new(UserStore::new()),
        )
    }

    #[test]
    fn register_then_login_round_trip() {
        let auth = service();
        let user = auth
            .register("Ada".into(), "ada@example.com".into(), "correct horse")
            .unwrap();
        assert_ne!(user.password_hash, "correct horse");

        let (token, logged_in) = auth.login("ada@example.com", "correct horse").unwrap();
        assert_eq!(logged_in.id, user.id);

        let claims = auth.authenticate_bearer(&format!("Bearer {token}")).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let auth = service();
        auth.register("Ada".into(), "ada@example.com".into(), "correct horse")
            .unwrap();
        let err = auth.login("ada@example.com", "battery staple").unwrap_err();
        assert_matches!(err, ServiceError::AuthError(_));
    }

    #[test]
    fn unknown_email_gets_the_same_error_as_bad_password() {
        let auth = service();
        let err = auth.login("ghost@example.com", "anything").unwrap_err();
        assert_matches!(err, ServiceError::AuthError(msg) if msg == INVALID_CREDENTIALS);
    }

    #[test]
    fn tampered_token_fails_verification() {
        let auth = service();
        let user = auth
            .register("Ada".into(), "ada@example.com".into(), "pw")
            .unwrap();
        let token = auth.issue_token(&user).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert_matches!(
            auth.verify_token(&tampered),
            Err(ServiceError::Unauthorized(_))
        );
        assert_matches!(
            auth.authenticate_bearer(&token),
            Err(ServiceError::Unauthorized(_))
        );
    }
}
