//! Order approval: turns a pending order into a parcel.
//!
//! Two variants exist. `Basic` copies the shipment details from the order
//! and only takes a cost. `Provisioning` takes the shipment details from
//! the admin, parks the parcel at status 0 for the notifier, and creates
//! an account for the sender when none exists.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::order_service::populate;
use super::{ProvisionedUser, UserService};
use crate::domain::{
    parse_id, NewParcel, Order, OrderDetails, OrderStatus, Parcel, ParcelStatus, Shipment,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Notifier, UnitOfWork};
use crate::jobs::{ApprovalEmail, EmailJob};
use crate::types::{optional_number, RequiredFields};

pub const APPROVAL_MESSAGE: &str = "Order approved and parcel created successfully";

/// Approval form. Only `cost` is read by the basic variant. Numbers may be
/// sent as numeric text, the way the admin form posts them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>, example = 2.5)]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>, example = 1500.0)]
    pub cost: Option<f64>,
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub origin_branch: Option<String>,
    #[schema(example = "6ba7b810-9dad-11d1-80b4-00c04fd430c8")]
    pub destination_branch: Option<String>,
    pub note: Option<String>,
    /// Shipping date as entered; defaults to now
    #[schema(example = "2025-06-01")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalVariant {
    Basic,
    Provisioning,
}

impl ApprovalRequest {
    /// Any shipment detail beyond the cost selects the provisioning flow.
    pub fn variant(&self) -> ApprovalVariant {
        let detailed = self.weight.is_some()
            || self.origin_branch.is_some()
            || self.destination_branch.is_some()
            || self.note.is_some()
            || self.date.is_some();

        if detailed {
            ApprovalVariant::Provisioning
        } else {
            ApprovalVariant::Basic
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    #[schema(example = "Order approved and parcel created successfully")]
    pub message: String,
    pub parcel: Parcel,
    pub order: OrderDetails,
    pub user_created: bool,
}

#[async_trait]
pub trait ApprovalService: Send + Sync {
    /// Approve a pending order. An order can be approved once.
    async fn approve(&self, order_id: Uuid, request: ApprovalRequest) -> AppResult<ApprovalOutcome>;
}

pub struct OrderApproval<U: UnitOfWork> {
    uow: Arc<U>,
    users: Arc<dyn UserService>,
    notifier: Arc<dyn Notifier>,
    login_url: String,
}

impl<U: UnitOfWork> OrderApproval<U> {
    pub fn new(
        uow: Arc<U>,
        users: Arc<dyn UserService>,
        notifier: Arc<dyn Notifier>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            uow,
            users,
            notifier,
            login_url: login_url.into(),
        }
    }

    fn basic_shipment(order: &Order, request: ApprovalRequest) -> Shipment {
        Shipment {
            weight: order.weight,
            cost: request.cost.unwrap_or_default(),
            note: order.note.clone(),
            date: Utc::now().to_rfc3339(),
            status: ParcelStatus::Pending,
            origin_branch: order.origin_branch,
            destination_branch: order.destination_branch,
        }
    }

    async fn provisioning_shipment(&self, request: ApprovalRequest) -> AppResult<Shipment> {
        let mut required = RequiredFields::new();
        let weight: f64 = required.value("weight", request.weight);
        let cost: f64 = required.value("cost", request.cost);
        let origin = required.text("originBranch", request.origin_branch);
        let destination = required.text("destinationBranch", request.destination_branch);
        required.finish()?;

        let origin_branch = parse_id(&origin, "originBranch")?;
        let destination_branch = parse_id(&destination, "destinationBranch")?;
        for (field, id) in [("Origin", origin_branch), ("Destination", destination_branch)] {
            if self.uow.branches().find_by_id(id).await?.is_none() {
                return Err(AppError::bad_request(format!("{} branch does not exist", field)));
            }
        }

        Ok(Shipment {
            weight,
            cost,
            note: request.note,
            date: request
                .date
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            status: ParcelStatus::NotifyPending,
            origin_branch,
            destination_branch,
        })
    }

    /// Create the sender's account and queue their credentials. Failures are
    /// logged and never fail the approval.
    async fn provision_sender(&self, order: &Order, parcel: &Parcel) -> bool {
        let provisioned = match self
            .users
            .provision_from_order(&order.sender_name, &order.sender_email)
            .await
        {
            Ok(Some(provisioned)) => provisioned,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Could not provision sender account");
                return false;
            }
        };

        let job = self.approval_email(order, parcel, &provisioned);
        if let Err(e) = self.notifier.enqueue_email(job).await {
            tracing::warn!(
                order_id = %order.id,
                user_id = %provisioned.user.id,
                error = %e,
                "Could not queue approval email"
            );
        }
        true
    }

    fn approval_email(&self, order: &Order, parcel: &Parcel, provisioned: &ProvisionedUser) -> EmailJob {
        let tracking_id = parcel.id.to_string();
        let email = ApprovalEmail {
            fullname: &provisioned.user.fullname,
            email: &provisioned.user.email,
            password: &provisioned.plain_password,
            tracking_id: &tracking_id,
            recipient_name: &order.recipient_name,
            delivery_city: &order.delivery_city,
            weight: parcel.weight,
            cost: parcel.cost,
            login_url: &self.login_url,
        };
        EmailJob::new(provisioned.user.email.clone(), email.subject(), email.render())
    }
}

#[async_trait]
impl<U: UnitOfWork> ApprovalService for OrderApproval<U> {
    async fn approve(&self, order_id: Uuid, request: ApprovalRequest) -> AppResult<ApprovalOutcome> {
        let order = self
            .uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_not_found("Order")?;

        if order.is_approved() {
            return Err(AppError::bad_request("Order already approved"));
        }

        let variant = request.variant();
        let shipment = match variant {
            ApprovalVariant::Basic => Self::basic_shipment(&order, request),
            ApprovalVariant::Provisioning => self.provisioning_shipment(request).await?,
        };

        let parcel = self
            .uow
            .parcels()
            .create(NewParcel::from_order(&order, shipment))
            .await?;

        let user_created = match variant {
            ApprovalVariant::Basic => false,
            ApprovalVariant::Provisioning => self.provision_sender(&order, &parcel).await,
        };

        let approved = self
            .uow
            .orders()
            .update_status(order.id, OrderStatus::Approved)
            .await
            .map_err(|e| {
                tracing::error!(
                    order_id = %order.id,
                    parcel_id = %parcel.id,
                    error = %e,
                    "Parcel created but order could not be marked approved"
                );
                e
            })?;

        tracing::info!(
            order_id = %approved.id,
            parcel_id = %parcel.id,
            ?variant,
            user_created,
            "Order approved"
        );

        let order = populate(self.uow.branches().as_ref(), approved).await?;
        Ok(ApprovalOutcome {
            message: APPROVAL_MESSAGE.to_string(),
            parcel,
            order,
            user_created,
        })
    }
}
