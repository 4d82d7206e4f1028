//! Shared request/response helpers.

mod numbers;
mod required;
mod response;

pub use numbers::optional_number;
pub use required::RequiredFields;
pub use response::{ApiResponse, Created, MessageResponse};
