//! Service container: one place that wires every use case to storage.

use std::future::Future;
use std::sync::Arc;

use super::{
    ApprovalService, AuthService, Authenticator, BranchManager, BranchService, OrderApproval,
    OrderManager, OrderService, ParcelManager, ParcelService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Notifier, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Access to every application service as a trait object.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn branches(&self) -> Arc<dyn BranchService>;
    fn orders(&self) -> Arc<dyn OrderService>;
    fn parcels(&self) -> Arc<dyn ParcelService>;
    fn approvals(&self) -> Arc<dyn ApprovalService>;
}

#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    branches: Arc<dyn BranchService>,
    orders: Arc<dyn OrderService>,
    parcels: Arc<dyn ParcelService>,
    approvals: Arc<dyn ApprovalService>,
}

impl Services {
    /// Build every service over a single unit of work.
    pub fn with_unit_of_work<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        config: Config,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let login_url = config.login_url();
        let users: Arc<dyn UserService> = Arc::new(UserManager::new(uow.clone()));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            branches: Arc::new(BranchManager::new(uow.clone())),
            orders: Arc::new(OrderManager::new(uow.clone())),
            parcels: Arc::new(ParcelManager::new(uow.clone())),
            approvals: Arc::new(OrderApproval::new(uow, users.clone(), notifier, login_url)),
            users,
        }
    }

    /// Production wiring over a SeaORM connection.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_unit_of_work(Arc::new(Persistence::new(db)), config, notifier)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn branches(&self) -> Arc<dyn BranchService> {
        self.branches.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelService> {
        self.parcels.clone()
    }

    fn approvals(&self) -> Arc<dyn ApprovalService> {
        self.approvals.clone()
    }
}

/// Helpers for running independent reads concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Run two fallible operations together; the first error wins.
    ///
    /// ```ignore
    /// let (orders, branches) = parallel::join2(orders.list(), branches.list()).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Run a batch of same-typed operations together and keep every
    /// outcome, in input order. One failure does not cancel the rest.
    pub async fn settle_all<I, F, T>(ops: I) -> Vec<AppResult<T>>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = AppResult<T>>,
    {
        futures::future::join_all(ops).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_join2_returns_both_results() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_join2_propagates_error() {
        let result = parallel::join2(
            async { Ok::<_, AppError>(1) },
            async { Err::<i32, _>(AppError::not_found("Parcel")) },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_settle_all_keeps_order() {
        let ops = (1..=3).map(|n| async move { Ok::<_, AppError>(n * 10) });
        let values: Vec<i32> = parallel::settle_all(ops)
            .await
            .into_iter()
            .map(|r| tokio_test::assert_ok!(r))
            .collect();
        assert_eq!(values, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_settle_all_runs_past_failures() {
        let ops = (0..3).map(|n| async move {
            if n == 1 {
                Err(AppError::bad_request("boom"))
            } else {
                Ok(n)
            }
        });
        let results = parallel::settle_all(ops).await;
        assert_eq!(results.len(), 3);
        tokio_test::assert_ok!(&results[0]);
        tokio_test::assert_err!(&results[1]);
        tokio_test::assert_ok!(&results[2]);
    }
}
