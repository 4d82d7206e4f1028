//! Booking intake and the admin review queue.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{OptionalJson, ValidatedJson};
use crate::api::AppState;
use crate::domain::{normalize_email, parse_id, NewOrder, Order, OrderDetails, OrderStatus};
use crate::errors::AppResult;
use crate::services::{ApprovalOutcome, ApprovalRequest};
use crate::types::{optional_number, Created, MessageResponse, RequiredFields};

/// Public booking form. Every field but `note` is required.
///
/// Origin and destination are not compared; only the booking page does that.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[schema(example = "Alice Otieno")]
    pub sender_name: Option<String>,
    #[validate(email(message = "senderEmail must be a valid email"))]
    #[schema(example = "alice@example.com")]
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_city: Option<String>,
    pub recipient_name: Option<String>,
    #[validate(email(message = "recipientEmail must be a valid email"))]
    pub recipient_email: Option<String>,
    pub recipient_phone: Option<String>,
    pub recipient_city: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>, example = 2.5)]
    pub weight: Option<f64>,
    pub note: Option<String>,
    pub pickup_city: Option<String>,
    pub delivery_city: Option<String>,
    pub origin_branch: Option<String>,
    pub destination_branch: Option<String>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> AppResult<NewOrder> {
        let mut required = RequiredFields::new();
        let sender_name = required.text("senderName", self.sender_name);
        let sender_email = required.text("senderEmail", self.sender_email);
        let sender_phone = required.text("senderPhone", self.sender_phone);
        let sender_city = required.text("senderCity", self.sender_city);
        let recipient_name = required.text("recipientName", self.recipient_name);
        let recipient_email = required.text("recipientEmail", self.recipient_email);
        let recipient_phone = required.text("recipientPhone", self.recipient_phone);
        let recipient_city = required.text("recipientCity", self.recipient_city);
        let weight: f64 = required.value("weight", self.weight);
        let pickup_city = required.text("pickupCity", self.pickup_city);
        let delivery_city = required.text("deliveryCity", self.delivery_city);
        let origin = required.text("originBranch", self.origin_branch);
        let destination = required.text("destinationBranch", self.destination_branch);
        required.finish()?;

        Ok(NewOrder {
            sender_name,
            sender_email: normalize_email(&sender_email),
            sender_phone,
            sender_city,
            recipient_name,
            recipient_email: normalize_email(&recipient_email),
            recipient_phone,
            recipient_city,
            weight,
            note: self.note.filter(|n| !n.trim().is_empty()),
            pickup_city,
            delivery_city,
            origin_branch: parse_id(&origin, "originBranch")?,
            destination_branch: parse_id(&destination, "destinationBranch")?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    #[schema(example = "Order created successfully")]
    pub message: String,
    pub order: Order,
    #[schema(example = "ORD-1718000000000-4821")]
    pub request_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// `Pending`, `Approved` or `Rejected`
    #[schema(example = "Rejected")]
    pub status: String,
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).put(update_order).delete(reject_order))
        .route("/:id/approve", post(approve_order))
}

/// Submit a booking request
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order received", body = OrderCreatedResponse),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<Created<OrderCreatedResponse>> {
    let order = state
        .order_service
        .create_order(payload.into_new_order()?)
        .await?;

    Ok(Created(OrderCreatedResponse {
        message: "Order created successfully".to_string(),
        request_id: order.request_id.clone(),
        order,
    }))
}

/// Every order, newest first, branches populated
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    responses((status = 200, description = "Orders", body = Vec<OrderDetails>))
)]
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<OrderDetails>>> {
    Ok(Json(state.order_service.list_orders().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderDetails),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetails>> {
    let order = state.order_service.get_order(parse_id(&id, "order")?).await?;
    Ok(Json(order))
}

/// Overwrite the review status
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderDetails),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderDetails>> {
    let id = parse_id(&id, "order")?;
    let status: OrderStatus = payload.status.parse()?;
    Ok(Json(state.order_service.update_status(id, status).await?))
}

/// Reject a booking; the order is deleted
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    responses((status = 200, description = "Order rejected", body = MessageResponse))
)]
pub async fn reject_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .order_service
        .reject_order(parse_id(&id, "order")?)
        .await?;
    Ok(Json(MessageResponse::new("Order rejected and deleted")))
}

/// Approve a booking and create its parcel.
///
/// A body with only `cost` (or no body) copies the shipment from the order. Any
/// of `weight`, `originBranch`, `destinationBranch`, `note` or `date` switches
/// to the provisioning flow, which requires weight, cost and both branches
/// and creates the sender's account when it does not exist yet.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/approve",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = ApprovalRequest,
    responses(
        (status = 201, description = "Order approved", body = ApprovalOutcome),
        (status = 400, description = "Already approved, unreadable body or missing fields"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn approve_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalJson(payload): OptionalJson<ApprovalRequest>,
) -> AppResult<Created<ApprovalOutcome>> {
    let id = parse_id(&id, "order")?;
    let request = payload.unwrap_or_default();
    let outcome = state.approval_service.approve(id, request).await?;
    Ok(Created(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn complete() -> CreateOrderRequest {
        CreateOrderRequest {
            sender_name: Some("Alice".to_string()),
            sender_email: Some("alice@example.com".to_string()),
            sender_phone: Some("0700".to_string()),
            sender_city: Some("Nairobi".to_string()),
            recipient_name: Some("Bob".to_string()),
            recipient_email: Some("bob@example.com".to_string()),
            recipient_phone: Some("0711".to_string()),
            recipient_city: Some("Mombasa".to_string()),
            weight: Some(2.5),
            note: None,
            pickup_city: Some("Nairobi".to_string()),
            delivery_city: Some("Mombasa".to_string()),
            origin_branch: Some(Uuid::new_v4().to_string()),
            destination_branch: Some(Uuid::new_v4().to_string()),
        }
    }

    #[test]
    fn test_complete_request_converts() {
        let order = complete().into_new_order().unwrap();
        assert_eq!(order.weight, 2.5);
        assert!(order.note.is_none());
    }

    #[test]
    fn test_same_origin_and_destination_accepted() {
        let branch = Uuid::new_v4().to_string();
        let request = CreateOrderRequest {
            origin_branch: Some(branch.clone()),
            destination_branch: Some(branch),
            ..complete()
        };
        assert!(request.into_new_order().is_ok());
    }

    #[test]
    fn test_missing_fields_are_all_named() {
        let request = CreateOrderRequest {
            sender_phone: None,
            weight: None,
            ..complete()
        };
        assert_eq!(
            request.into_new_order().unwrap_err().to_string(),
            "Missing required fields: senderPhone, weight"
        );
    }

    #[test]
    fn test_non_positive_weight_fails_validation() {
        let request = CreateOrderRequest {
            weight: Some(0.0),
            ..complete()
        };
        assert!(request.validate().is_err());
    }
}
