//! Authentication service - registration, login and token verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{is_valid_role, Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    normalize_email, AccountStatus, CreateUser, NewUser, Password, User, UserResponse, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Login result: a bearer token plus the account it belongs to, so the
/// admin front end can refuse non-admin logins.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, input: CreateUser) -> AppResult<User>;

    /// Unknown email and wrong password fail identically.
    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse>;

    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<LoginResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(LoginResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserResponse::from(user.clone()),
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: CreateUser) -> AppResult<User> {
        let role = match input.role.as_deref() {
            None => UserRole::User,
            Some(role) if is_valid_role(role) => UserRole::from(role),
            Some(role) => {
                return Err(AppError::validation(format!(
                    "Invalid role '{}': expected user or admin",
                    role
                )))
            }
        };

        let email = normalize_email(&input.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                fullname: input.fullname.trim().to_string(),
                email,
                password_hash,
                age: input.age,
                country: input.country,
                address: input.address,
                role,
                status: AccountStatus::Active,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse> {
        let email = normalize_email(&email);
        let user_result = self.uow.users().find_by_email(&email).await?;

        // Verify against a dummy hash when the user is unknown so both
        // failure paths take the same time.
        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let password_hash = user_result
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(dummy_hash);
        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        match user_result {
            Some(user) if password_valid => generate_token(&user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::StaticUnitOfWork;
    use crate::infra::{
        MockBranchRepository, MockOrderRepository, MockParcelRepository, MockUserRepository,
    };

    const SECRET: &str = "unit-test-secret-that-is-long-enough!!";

    fn uow(users: MockUserRepository) -> Arc<StaticUnitOfWork> {
        Arc::new(StaticUnitOfWork {
            branches: Arc::new(MockBranchRepository::new()),
            users: Arc::new(users),
            orders: Arc::new(MockOrderRepository::new()),
            parcels: Arc::new(MockParcelRepository::new()),
        })
    }

    fn stored_user(email: &str, plain: &str, role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            fullname: "Stored".to_string(),
            email: email.to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            age: None,
            country: None,
            address: None,
            role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn registration(email: &str, role: Option<&str>) -> CreateUser {
        CreateUser {
            fullname: "Jane".to_string(),
            email: email.to_string(),
            password: "SecurePass123!".to_string(),
            age: Some(30),
            country: None,
            address: None,
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_login_returns_token_and_role() {
        let user = stored_user("admin@sendit.com", "AdminPass123", UserRole::Admin);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(uow(users), Config::for_tests(SECRET));
        let login = auth
            .login("Admin@Sendit.com ".to_string(), "AdminPass123".to_string())
            .await
            .unwrap();

        assert_eq!(login.user.role, "admin");
        let claims = auth.verify_token(&login.access_token).unwrap();
        assert_eq!(claims.email, "admin@sendit.com");
        assert_eq!(claims.role, "admin");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let user = stored_user("jane@example.com", "RightPass123", UserRole::User);
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |email| {
            Ok((email == "jane@example.com").then(|| user.clone()))
        });

        let auth = Authenticator::new(uow(users), Config::for_tests(SECRET));
        let wrong_password = auth
            .login("jane@example.com".to_string(), "WrongPass123".to_string())
            .await
            .unwrap_err();
        let unknown = auth
            .login("nobody@example.com".to_string(), "RightPass123".to_string())
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown.to_string());
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let existing = stored_user("jane@example.com", "Whatever123", UserRole::User);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().never();

        let auth = Authenticator::new(uow(users), Config::for_tests(SECRET));
        let err = auth
            .register(registration("jane@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let auth = Authenticator::new(uow(MockUserRepository::new()), Config::for_tests(SECRET));
        let err = auth
            .register(registration("jane@example.com", Some("superuser")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_activates() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().returning(|new| {
            assert_ne!(new.password_hash, "SecurePass123!");
            assert_eq!(new.status, AccountStatus::Active);
            assert_eq!(new.role, UserRole::Admin);
            let now = Utc::now();
            Ok(User {
                id: Uuid::new_v4(),
                fullname: new.fullname,
                email: new.email,
                password_hash: new.password_hash,
                age: new.age,
                country: new.country,
                address: new.address,
                role: new.role,
                status: new.status,
                created_at: now,
                updated_at: now,
            })
        });

        let auth = Authenticator::new(uow(users), Config::for_tests(SECRET));
        let user = auth
            .register(registration("JANE@example.com", Some("admin")))
            .await
            .unwrap();
        assert_eq!(user.email, "jane@example.com");
    }
}
