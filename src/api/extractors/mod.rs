//! Request extractors.

mod optional_json;
mod validated_json;

pub use optional_json::OptionalJson;
pub use validated_json::ValidatedJson;
