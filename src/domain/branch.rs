//! Branch directory entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A physical courier office used as origin or destination.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[schema(example = "Westlands Hub")]
    pub name: String,
    #[schema(example = "Nairobi")]
    pub city: String,
    #[schema(example = "Nairobi County")]
    pub state: String,
    #[schema(example = "Waiyaki Way 12")]
    pub address: String,
    #[schema(example = "+254700000000")]
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBranch {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
}

/// Partial branch update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct BranchChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}
