//! Infrastructure layer - External systems integration
//!
//! PostgreSQL (SeaORM repositories and migrations), the Redis connection
//! used for throttling, and the apalis email queue.

pub mod cache;
pub mod db;
pub mod queue;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use queue::{JobQueue, Notifier};
pub use repositories::{
    BranchRepository, BranchStore, OrderRepository, OrderStore, ParcelRepository, ParcelStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use queue::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBranchRepository, MockOrderRepository, MockParcelRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::StaticUnitOfWork;
