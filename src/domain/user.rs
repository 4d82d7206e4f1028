//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    ACCOUNT_STATUS_ACTIVE, ACCOUNT_STATUS_NOTIFY_PENDING, ROLE_ADMIN, ROLE_USER,
};

/// User roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// Account status flag.
///
/// Accounts synthesized by order approval start at `NotifyPending` until the
/// notifier has processed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    NotifyPending,
    Active,
}

impl AccountStatus {
    pub fn code(self) -> i16 {
        match self {
            AccountStatus::NotifyPending => ACCOUNT_STATUS_NOTIFY_PENDING,
            AccountStatus::Active => ACCOUNT_STATUS_ACTIVE,
        }
    }

    /// Unknown codes are treated as active.
    pub fn from_code(code: i16) -> Self {
        if code == ACCOUNT_STATUS_NOTIFY_PENDING {
            AccountStatus::NotifyPending
        } else {
            AccountStatus::Active
        }
    }
}

/// Canonical form of an email address: trimmed and lowercased.
///
/// Every address that is stored or looked up goes through this, so an
/// order booked as `Alice@Example.com` belongs to `alice@example.com`.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
}

/// User registration data
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "Jane Wanjiru")]
    pub fullname: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Plain password (minimum 8 characters)
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[schema(example = 29)]
    pub age: Option<i32>,
    #[schema(example = "Kenya")]
    pub country: Option<String>,
    #[schema(example = "Nairobi")]
    pub address: Option<String>,
    /// `user` (default) or `admin`
    #[schema(example = "user")]
    pub role: Option<String>,
}

/// Partial user update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub fullname: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Jane Wanjiru")]
    pub fullname: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub address: Option<String>,
    #[schema(example = "user")]
    pub role: String,
    /// 0 = welcome notification pending, 1 = active
    #[schema(example = 1)]
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            age: user.age,
            country: user.country,
            address: user.address,
            role: user.role.to_string(),
            status: user.status.code(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Dashboard counters for the user store.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[schema(example = 42)]
    pub total_users: u64,
}
