//! HTTP request handlers, one module per route group.

pub mod auth_handler;
pub mod branch_handler;
pub mod order_handler;
pub mod parcel_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use branch_handler::branch_routes;
pub use order_handler::order_routes;
pub use parcel_handler::parcel_routes;
pub use user_handler::user_routes;
