//! Order intake: public booking requests awaiting admin review.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Branch;
use crate::config::{
    ORDER_REQUEST_ID_PREFIX, ORDER_REQUEST_ID_SUFFIX_BOUND, ORDER_STATUS_APPROVED,
    ORDER_STATUS_PENDING, ORDER_STATUS_REJECTED,
};
use crate::errors::AppError;

/// Review state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => ORDER_STATUS_PENDING,
            OrderStatus::Approved => ORDER_STATUS_APPROVED,
            OrderStatus::Rejected => ORDER_STATUS_REJECTED,
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ORDER_STATUS_PENDING => Ok(OrderStatus::Pending),
            ORDER_STATUS_APPROVED => Ok(OrderStatus::Approved),
            ORDER_STATUS_REJECTED => Ok(OrderStatus::Rejected),
            other => Err(AppError::validation(format!(
                "Invalid order status '{}': expected Pending, Approved or Rejected",
                other
            ))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity as stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Human-readable id, generated once at intake
    #[schema(example = "ORD-1718000000000-4821")]
    pub request_id: String,

    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: String,
    pub sender_city: String,

    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub recipient_city: String,

    #[schema(example = 2.5)]
    pub weight: f64,
    pub note: Option<String>,
    pub pickup_city: String,
    pub delivery_city: String,

    pub origin_branch: Uuid,
    pub destination_branch: Uuid,

    pub status: OrderStatus,
    pub request_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_approved(&self) -> bool {
        self.status == OrderStatus::Approved
    }

    /// Generate a fresh `ORD-<unix-millis>-<0..9999>` request id.
    pub fn generate_request_id(now: DateTime<Utc>) -> String {
        let suffix = OsRng.next_u32() % ORDER_REQUEST_ID_SUFFIX_BOUND;
        format_request_id(now.timestamp_millis(), suffix)
    }
}

fn format_request_id(millis: i64, suffix: u32) -> String {
    format!("{}-{}-{}", ORDER_REQUEST_ID_PREFIX, millis, suffix)
}

/// Fields required to insert an order. Status starts at Pending and the
/// request id is assigned by the repository on insert.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: String,
    pub sender_city: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub recipient_city: String,
    pub weight: f64,
    pub note: Option<String>,
    pub pickup_city: String,
    pub delivery_city: String,
    pub origin_branch: Uuid,
    pub destination_branch: Uuid,
}

/// A branch reference that is replaced by the full record when it resolves.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BranchRef {
    Populated(Branch),
    Id(Uuid),
}

impl BranchRef {
    pub fn resolve(id: Uuid, lookup: impl Fn(&Uuid) -> Option<Branch>) -> Self {
        lookup(&id).map(BranchRef::Populated).unwrap_or(BranchRef::Id(id))
    }
}

/// Order with its branch references populated, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub request_id: String,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: String,
    pub sender_city: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub recipient_city: String,
    pub weight: f64,
    pub note: Option<String>,
    pub pickup_city: String,
    pub delivery_city: String,
    pub origin_branch: BranchRef,
    pub destination_branch: BranchRef,
    pub status: OrderStatus,
    pub request_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetails {
    pub fn populate(order: Order, lookup: impl Fn(&Uuid) -> Option<Branch>) -> Self {
        Self {
            origin_branch: BranchRef::resolve(order.origin_branch, &lookup),
            destination_branch: BranchRef::resolve(order.destination_branch, &lookup),
            id: order.id,
            request_id: order.request_id,
            sender_name: order.sender_name,
            sender_email: order.sender_email,
            sender_phone: order.sender_phone,
            sender_city: order.sender_city,
            recipient_name: order.recipient_name,
            recipient_email: order.recipient_email,
            recipient_phone: order.recipient_phone,
            recipient_city: order.recipient_city,
            weight: order.weight,
            note: order.note,
            pickup_city: order.pickup_city,
            delivery_city: order.delivery_city,
            status: order.status,
            request_date: order.request_date,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_format() {
        assert_eq!(format_request_id(1718000000000, 42), "ORD-1718000000000-42");

        let generated = Order::generate_request_id(Utc::now());
        let parts: Vec<_> = generated.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().unwrap() < ORDER_REQUEST_ID_SUFFIX_BOUND);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Approved".parse::<OrderStatus>().unwrap(), OrderStatus::Approved);
        assert!("approved".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"Pending\""
        );
    }

    #[test]
    fn test_branch_ref_falls_back_to_id() {
        let id = Uuid::new_v4();
        let resolved = BranchRef::resolve(id, |_| None);
        assert_eq!(resolved, BranchRef::Id(id));
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            serde_json::json!(id.to_string())
        );
    }
}
