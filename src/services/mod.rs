//! Application services: the use cases behind each route group.
//!
//! Every manager is generic over a `UnitOfWork`, so tests can swap the
//! SeaORM stores for mocks or in-memory fakes.

mod approval_service;
mod auth_service;
mod branch_service;
pub mod container;
mod order_service;
mod parcel_service;
mod user_service;

pub use container::{parallel, ServiceContainer, Services};

pub use approval_service::{
    ApprovalOutcome, ApprovalRequest, ApprovalService, ApprovalVariant, OrderApproval,
    APPROVAL_MESSAGE,
};
pub use auth_service::{AuthService, Authenticator, Claims, LoginResponse};
pub use branch_service::{BranchManager, BranchService};
pub use order_service::{OrderManager, OrderService};
pub use parcel_service::{ParcelManager, ParcelService};
pub use user_service::{ProvisionedUser, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
