//! Domain layer - Core business entities and logic
//!
//! Branches, users, orders and parcels, plus the value objects shared
//! between them. Nothing here talks to the database or the network.

pub mod branch;
pub mod ids;
pub mod order;
pub mod parcel;
pub mod password;
pub mod status;
pub mod user;

pub use branch::{Branch, BranchChanges, NewBranch};
pub use ids::parse_id;
pub use order::{BranchRef, NewOrder, Order, OrderDetails, OrderStatus};
pub use parcel::{NewParcel, Parcel, ParcelChanges, ParcelStats, Shipment, TrackingView};
pub use password::Password;
pub use status::ParcelStatus;
pub use user::{
    normalize_email, AccountStatus, CreateUser, NewUser, User, UserChanges, UserResponse,
    UserRole, UserStats,
};
