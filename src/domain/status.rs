//! Parcel status lifecycle.
//!
//! A single lookup table backs every status-to-label mapping in the API,
//! so tracking, admin views and emails always agree.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Parcel status as stored in the `status` column.
///
/// `1..=5` walk the delivery progression. `0` is a transient marker set by the
/// provisioning approval flow so the notifier knows a "pending" email is owed;
/// it is not a delivery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum ParcelStatus {
    NotifyPending,
    Pending,
    Dispatched,
    InTransit,
    OutForDelivery,
    Delivered,
}

/// `(status, code, label)` rows, in lifecycle order.
const STATUS_TABLE: [(ParcelStatus, i16, &str); 6] = [
    (ParcelStatus::NotifyPending, 0, "Pending"),
    (ParcelStatus::Pending, 1, "Pending"),
    (ParcelStatus::Dispatched, 2, "Dispatched"),
    (ParcelStatus::InTransit, 3, "In Transit"),
    (ParcelStatus::OutForDelivery, 4, "Out for Delivery"),
    (ParcelStatus::Delivered, 5, "Delivered"),
];

impl ParcelStatus {
    /// The five delivery states an admin may write, in timeline order.
    pub const DELIVERY_STATES: [ParcelStatus; 5] = [
        ParcelStatus::Pending,
        ParcelStatus::Dispatched,
        ParcelStatus::InTransit,
        ParcelStatus::OutForDelivery,
        ParcelStatus::Delivered,
    ];

    /// Integer code stored in the database and sent over the wire.
    pub fn code(self) -> i16 {
        STATUS_TABLE
            .iter()
            .find(|(status, _, _)| *status == self)
            .map(|(_, code, _)| *code)
            .unwrap_or_default()
    }

    /// Human-readable label shown to customers.
    pub fn label(self) -> &'static str {
        STATUS_TABLE
            .iter()
            .find(|(status, _, _)| *status == self)
            .map(|(_, _, label)| *label)
            .unwrap_or("Unknown")
    }

    /// Look up any known code, including the transient `0`.
    pub fn from_code(code: i16) -> Option<Self> {
        STATUS_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(status, _, _)| *status)
    }

    /// Parse a status an admin is allowed to set directly (`1..=5`).
    ///
    /// No ordering rule applies: any delivery state may replace any other.
    pub fn delivery_state(code: i16) -> Result<Self, AppError> {
        match Self::from_code(code) {
            Some(status) if status.is_delivery_state() => Ok(status),
            _ => Err(AppError::validation(format!(
                "Invalid parcel status {}: expected a value between 1 and 5",
                code
            ))),
        }
    }

    pub fn is_delivery_state(self) -> bool {
        !matches!(self, ParcelStatus::NotifyPending)
    }

    /// Zero-based position on the tracking timeline; `None` before the
    /// parcel has entered it.
    pub fn step_index(self) -> Option<usize> {
        Self::DELIVERY_STATES.iter().position(|s| *s == self)
    }
}

impl From<ParcelStatus> for i16 {
    fn from(status: ParcelStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i16> for ParcelStatus {
    type Error = String;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        ParcelStatus::from_code(code).ok_or_else(|| format!("unknown parcel status {}", code))
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_labels() {
        let labels: Vec<_> = ParcelStatus::DELIVERY_STATES
            .iter()
            .map(|s| (s.code(), s.label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (1, "Pending"),
                (2, "Dispatched"),
                (3, "In Transit"),
                (4, "Out for Delivery"),
                (5, "Delivered"),
            ]
        );
    }

    #[test]
    fn test_zero_is_not_a_delivery_state() {
        let status = ParcelStatus::from_code(0).unwrap();
        assert_eq!(status, ParcelStatus::NotifyPending);
        assert!(!status.is_delivery_state());
        assert_eq!(status.step_index(), None);
        assert!(ParcelStatus::delivery_state(0).is_err());
    }

    #[test]
    fn test_any_jump_between_delivery_states_is_allowed() {
        assert_eq!(
            ParcelStatus::delivery_state(5).unwrap(),
            ParcelStatus::Delivered
        );
        assert_eq!(ParcelStatus::delivery_state(2).unwrap().step_index(), Some(1));
    }

    #[test]
    fn test_out_of_range_codes_rejected() {
        assert!(ParcelStatus::delivery_state(6).is_err());
        assert!(ParcelStatus::delivery_state(-1).is_err());
        assert!(ParcelStatus::from_code(42).is_none());
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&ParcelStatus::InTransit).unwrap();
        assert_eq!(json, "3");
        let parsed: ParcelStatus = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, ParcelStatus::OutForDelivery);
        assert!(serde_json::from_str::<ParcelStatus>("9").is_err());
    }
}
