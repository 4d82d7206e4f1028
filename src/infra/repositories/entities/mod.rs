//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod branch;
pub mod order;
pub mod parcel;
pub mod user;
