//! Parcel record: the confirmed shipment and its public tracking projection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Order, ParcelStatus};

/// Shipment record. Its id doubles as the public tracking id.
///
/// Field names follow the stored document keys the front ends consume.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Parcel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Pickup city
    #[schema(example = "Nairobi")]
    pub from: String,
    /// Delivery city
    #[schema(example = "Mombasa")]
    pub to: String,
    pub sendername: String,
    pub recipientname: String,
    pub senderemail: String,
    pub recipientemail: String,
    #[schema(example = 2.0)]
    pub weight: f64,
    #[schema(example = 500.0)]
    pub cost: f64,
    pub note: Option<String>,
    /// Free-form shipping date as entered (ISO-8601 when generated)
    pub date: String,
    #[schema(value_type = i16, example = 1)]
    pub status: ParcelStatus,
    #[serde(rename = "originBranch")]
    pub origin_branch: Option<Uuid>,
    #[serde(rename = "destinationBranch")]
    pub destination_branch: Option<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParcel {
    pub from: String,
    pub to: String,
    pub sendername: String,
    pub recipientname: String,
    pub senderemail: String,
    pub recipientemail: String,
    pub weight: f64,
    pub cost: f64,
    pub note: Option<String>,
    pub date: String,
    pub status: ParcelStatus,
    pub origin_branch: Option<Uuid>,
    pub destination_branch: Option<Uuid>,
}

impl NewParcel {
    /// Copy the identity and route fields of an order into a parcel draft.
    /// Shipment details come from the caller.
    pub fn from_order(order: &Order, shipment: Shipment) -> Self {
        Self {
            from: order.pickup_city.clone(),
            to: order.delivery_city.clone(),
            sendername: order.sender_name.clone(),
            recipientname: order.recipient_name.clone(),
            senderemail: order.sender_email.clone(),
            recipientemail: order.recipient_email.clone(),
            weight: shipment.weight,
            cost: shipment.cost,
            note: shipment.note,
            date: shipment.date,
            status: shipment.status,
            origin_branch: Some(shipment.origin_branch),
            destination_branch: Some(shipment.destination_branch),
        }
    }
}

/// Shipment details decided at approval time.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub weight: f64,
    pub cost: f64,
    pub note: Option<String>,
    pub date: String,
    pub status: ParcelStatus,
    pub origin_branch: Uuid,
    pub destination_branch: Uuid,
}

/// Partial parcel update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelChanges {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sendername: Option<String>,
    pub recipientname: Option<String>,
    pub senderemail: Option<String>,
    pub recipientemail: Option<String>,
    pub weight: Option<f64>,
    pub cost: Option<f64>,
    pub note: Option<String>,
    pub date: Option<String>,
    pub status: Option<ParcelStatus>,
    pub origin_branch: Option<Uuid>,
    pub destination_branch: Option<Uuid>,
}

impl ParcelChanges {
    pub fn status(status: ParcelStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Public tracking projection: the full parcel plus its status label.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackingView {
    #[serde(flatten)]
    pub parcel: Parcel,
    #[serde(rename = "statusLabel")]
    #[schema(value_type = String, example = "In Transit")]
    pub status_label: &'static str,
    /// Zero-based position on the delivery timeline; absent for status 0.
    #[serde(rename = "statusStep", skip_serializing_if = "Option::is_none")]
    #[schema(example = 2)]
    pub status_step: Option<usize>,
}

impl From<Parcel> for TrackingView {
    fn from(parcel: Parcel) -> Self {
        Self {
            status_label: parcel.status.label(),
            status_step: parcel.status.step_index(),
            parcel,
        }
    }
}

/// Dashboard counters.
///
/// `delivered` counts status 3 and `pending` counts status 1, which is what
/// the admin dashboard has always displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ParcelStats {
    #[schema(example = 12)]
    pub delivered: u64,
    #[schema(example = 30)]
    pub pending: u64,
}

impl ParcelStats {
    pub const DELIVERED_STATUS: ParcelStatus = ParcelStatus::InTransit;
    pub const PENDING_STATUS: ParcelStatus = ParcelStatus::Pending;
}
