//! User service - account administration and order-driven provisioning.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    normalize_email, AccountStatus, NewUser, Password, User, UserChanges, UserRole, UserStats,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Account created on a customer's behalf, with the one-time plain password
/// that has to reach them by email.
#[derive(Debug, Clone)]
pub struct ProvisionedUser {
    pub user: User,
    pub plain_password: String,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// All users, newest first.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Permanently delete a user.
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    async fn stats(&self) -> AppResult<UserStats>;

    /// Create an account for an order's sender unless one already exists
    /// for `email`. Returns `None` when the email is taken.
    ///
    /// The lookup and the insert are separate statements, so a concurrent
    /// registration for the same address can still slip in between.
    async fn provision_from_order(
        &self,
        fullname: &str,
        email: &str,
    ) -> AppResult<Option<ProvisionedUser>>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        if let Some(name) = changes.fullname.as_deref() {
            if name.trim().is_empty() {
                return Err(AppError::validation("fullname must not be empty"));
            }
        }
        self.uow.users().update(id, changes).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        if !self.uow.users().delete(id).await? {
            return Err(AppError::not_found("User"));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn stats(&self) -> AppResult<UserStats> {
        let total_users = self.uow.users().count().await?;
        Ok(UserStats { total_users })
    }

    async fn provision_from_order(
        &self,
        fullname: &str,
        email: &str,
    ) -> AppResult<Option<ProvisionedUser>> {
        let email = normalize_email(&email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            tracing::debug!(email = %email, "Sender already has an account");
            return Ok(None);
        }

        let plain_password = Password::generate_plain();
        let password_hash = Password::new(&plain_password)?.into_string();

        let user = self
            .uow
            .users()
            .create(NewUser {
                fullname: fullname.trim().to_string(),
                email,
                password_hash,
                age: None,
                country: None,
                address: None,
                role: UserRole::User,
                status: AccountStatus::NotifyPending,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Provisioned account for order sender");
        Ok(Some(ProvisionedUser {
            user,
            plain_password,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::config::GENERATED_PASSWORD_LENGTH;
    use crate::infra::unit_of_work::StaticUnitOfWork;
    use crate::infra::{
        MockBranchRepository, MockOrderRepository, MockParcelRepository, MockUserRepository,
    };

    fn uow(users: MockUserRepository) -> Arc<StaticUnitOfWork> {
        Arc::new(StaticUnitOfWork {
            branches: Arc::new(MockBranchRepository::new()),
            users: Arc::new(users),
            orders: Arc::new(MockOrderRepository::new()),
            parcels: Arc::new(MockParcelRepository::new()),
        })
    }

    fn user_from(new: NewUser) -> User {
        let now = Utc::now();
        User {
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
        }
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let err = UserManager::new(uow(users)).get_user(id).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_delete().returning(|_| Ok(false));

        let result = UserManager::new(uow(users)).delete_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_counts_users() {
        let mut users = MockUserRepository::new();
        users.expect_count().returning(|| Ok(7));

        let stats = UserManager::new(uow(users)).stats().await.unwrap();
        assert_eq!(stats.total_users, 7);
    }

    #[tokio::test]
    async fn test_provision_creates_notify_pending_user_with_generated_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|new| Ok(user_from(new)));

        let provisioned = UserManager::new(uow(users))
            .provision_from_order("Alice Sender", "Alice@Example.com")
            .await
            .unwrap()
            .expect("a new account");

        assert_eq!(provisioned.user.email, "alice@example.com");
        assert_eq!(provisioned.user.status, AccountStatus::NotifyPending);
        assert_eq!(provisioned.user.role, UserRole::User);
        assert_eq!(provisioned.plain_password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(Password::from_hash(provisioned.user.password_hash.clone())
            .verify(&provisioned.plain_password));
    }

    #[tokio::test]
    async fn test_provision_skips_existing_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|email| {
            Ok(Some(user_from(NewUser {
                fullname: "Existing".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                age: None,
                country: None,
                address: None,
                role: UserRole::User,
                status: AccountStatus::Active,
            })))
        });
        users.expect_create().never();

        let provisioned = UserManager::new(uow(users))
            .provision_from_order("Alice", "alice@example.com")
            .await
            .unwrap();
        assert!(provisioned.is_none());
    }
}
