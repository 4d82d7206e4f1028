//! Repository layer - Data access abstraction
//!
//! Each aggregate gets a trait (mockable in tests) and a SeaORM-backed store.

mod branch_repository;
pub(crate) mod entities;
mod order_repository;
mod parcel_repository;
mod user_repository;

pub use branch_repository::{BranchRepository, BranchStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use parcel_repository::{ParcelRepository, ParcelStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use branch_repository::MockBranchRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use parcel_repository::MockParcelRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
