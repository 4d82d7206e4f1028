//! SendIT parcel delivery API.
//!
//! Customers book a shipment through a public form, staff approve the
//! booking into a parcel, and anyone can track that parcel by id.
//!
//! # Layers
//!
//! - **cli** / **commands**: `serve`, `migrate`, `jobs`, `seed`
//! - **config**: environment settings and constants
//! - **domain**: branches, users, orders, parcels and the status table
//! - **services**: use cases behind each route group, including approval
//! - **infra**: SeaORM stores and migrations, Redis, the email queue
//! - **jobs**: email delivery and the status-0 notifier sweep
//! - **api**: axum router, handlers, middleware, OpenAPI
//! - **types**: shared response wrappers and request helpers
//! - **errors**: `AppError` and its HTTP rendering
//!
//! ```bash
//! sendit migrate up
//! sendit seed admin
//! sendit serve
//! sendit jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Branch, Order, Parcel, ParcelStatus, User};
pub use errors::{AppError, AppResult};
