//! Parcel administration, public tracking and the customer's own parcels.

use axum::{
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{OptionalJson, ValidatedJson};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    normalize_email, parse_id, NewParcel, Parcel, ParcelChanges, ParcelStats, ParcelStatus,
    TrackingView,
};
use crate::errors::{AppError, AppResult};
use crate::types::{optional_number, ApiResponse, Created, MessageResponse, RequiredFields};

/// Admin parcel form. Everything but `note`, `status` and the branches is
/// required; status defaults to 1.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParcelRequest {
    #[schema(example = "Nairobi")]
    pub from: Option<String>,
    #[schema(example = "Mombasa")]
    pub to: Option<String>,
    pub sendername: Option<String>,
    pub recipientname: Option<String>,
    #[validate(email(message = "senderemail must be a valid email"))]
    pub senderemail: Option<String>,
    #[validate(email(message = "recipientemail must be a valid email"))]
    pub recipientemail: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>)]
    pub cost: Option<f64>,
    pub note: Option<String>,
    #[schema(example = "2025-06-01")]
    pub date: Option<String>,
    /// 1 Pending, 2 Dispatched, 3 In Transit, 4 Out for Delivery, 5 Delivered
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<i16>, example = 1)]
    pub status: Option<i16>,
    pub origin_branch: Option<String>,
    pub destination_branch: Option<String>,
}

impl CreateParcelRequest {
    fn into_new_parcel(self) -> AppResult<NewParcel> {
        let mut required = RequiredFields::new();
        let from = required.text("from", self.from);
        let to = required.text("to", self.to);
        let sendername = required.text("sendername", self.sendername);
        let recipientname = required.text("recipientname", self.recipientname);
        let senderemail = required.text("senderemail", self.senderemail);
        let recipientemail = required.text("recipientemail", self.recipientemail);
        let weight: f64 = required.value("weight", self.weight);
        let cost: f64 = required.value("cost", self.cost);
        let date = required.text("date", self.date);
        required.finish()?;

        let status = match self.status {
            Some(code) => ParcelStatus::delivery_state(code)?,
            None => ParcelStatus::Pending,
        };

        Ok(NewParcel {
            from,
            to,
            sendername,
            recipientname,
            senderemail: normalize_email(&senderemail),
            recipientemail: normalize_email(&recipientemail),
            weight,
            cost,
            note: self.note,
            date,
            status,
            origin_branch: optional_id(self.origin_branch, "originBranch")?,
            destination_branch: optional_id(self.destination_branch, "destinationBranch")?,
        })
    }
}

/// Partial parcel update; `status` must be 1..5 when present.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParcelRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sendername: Option<String>,
    pub recipientname: Option<String>,
    #[validate(email(message = "senderemail must be a valid email"))]
    pub senderemail: Option<String>,
    #[validate(email(message = "recipientemail must be a valid email"))]
    pub recipientemail: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<f64>)]
    pub cost: Option<f64>,
    pub note: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    #[schema(value_type = Option<i16>, example = 3)]
    pub status: Option<i16>,
    pub origin_branch: Option<String>,
    pub destination_branch: Option<String>,
}

impl UpdateParcelRequest {
    fn into_changes(self) -> AppResult<ParcelChanges> {
        Ok(ParcelChanges {
            status: self.status.map(ParcelStatus::delivery_state).transpose()?,
            origin_branch: optional_id(self.origin_branch, "originBranch")?,
            destination_branch: optional_id(self.destination_branch, "destinationBranch")?,
            from: self.from,
            to: self.to,
            sendername: self.sendername,
            recipientname: self.recipientname,
            senderemail: self.senderemail.as_deref().map(normalize_email),
            recipientemail: self.recipientemail.as_deref().map(normalize_email),
            weight: self.weight,
            cost: self.cost,
            note: self.note,
            date: self.date,
        })
    }
}

fn optional_id(raw: Option<String>, what: &str) -> AppResult<Option<uuid::Uuid>> {
    raw.filter(|r| !r.trim().is_empty())
        .map(|r| parse_id(&r, what))
        .transpose()
}

/// Optional body of `POST /parcels/me`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MyParcelsRequest {
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
}

/// Error body of the tracking endpoint: `{ success: false, message }`.
pub struct TrackingFailure(AppError);

impl IntoResponse for TrackingFailure {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let message = match &self.0 {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound(_) => self.0.to_string(),
            other => {
                tracing::error!(error = %other, "Tracking lookup failed");
                "Error tracking parcel".to_string()
            }
        };
        (status, Json(ApiResponse::failure(message))).into_response()
    }
}

pub fn parcel_routes(state: AppState) -> Router<AppState> {
    let mine = Router::new()
        .route("/me", post(my_parcels))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_parcels).post(create_parcel))
        .route("/track/:tracking_id", get(track_parcel))
        .route("/stats/overview", get(parcel_stats))
        .route("/find/:id", get(get_parcel).put(update_parcel))
        .route("/:id", put(update_parcel).delete(delete_parcel))
        .merge(mine)
}

#[utoipa::path(
    post,
    path = "/api/v1/parcels",
    tag = "Parcels",
    request_body = CreateParcelRequest,
    responses(
        (status = 201, description = "Parcel created", body = Parcel),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn create_parcel(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateParcelRequest>,
) -> AppResult<Created<Parcel>> {
    let parcel = state
        .parcel_service
        .create_parcel(payload.into_new_parcel()?)
        .await?;
    Ok(Created(parcel))
}

/// Every parcel, newest first
#[utoipa::path(
    get,
    path = "/api/v1/parcels",
    tag = "Parcels",
    responses((status = 200, description = "Parcels", body = Vec<Parcel>))
)]
pub async fn list_parcels(State(state): State<AppState>) -> AppResult<Json<Vec<Parcel>>> {
    Ok(Json(state.parcel_service.list_parcels().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/parcels/find/{id}",
    tag = "Parcels",
    params(("id" = String, Path, description = "Parcel id")),
    responses(
        (status = 200, description = "Parcel", body = Parcel),
        (status = 404, description = "Parcel not found")
    )
)]
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Parcel>> {
    let parcel = state
        .parcel_service
        .get_parcel(parse_id(&id, "parcel")?)
        .await?;
    Ok(Json(parcel))
}

/// Update a parcel. Status may jump to any of 1..5.
#[utoipa::path(
    put,
    path = "/api/v1/parcels/{id}",
    tag = "Parcels",
    params(("id" = String, Path, description = "Parcel id")),
    request_body = UpdateParcelRequest,
    responses(
        (status = 201, description = "Updated parcel", body = Parcel),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Parcel not found")
    )
)]
pub async fn update_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateParcelRequest>,
) -> AppResult<Created<Parcel>> {
    let id = parse_id(&id, "parcel")?;
    let parcel = state
        .parcel_service
        .update_parcel(id, payload.into_changes()?)
        .await?;
    Ok(Created(parcel))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parcels/{id}",
    tag = "Parcels",
    params(("id" = String, Path, description = "Parcel id")),
    responses((status = 200, description = "Parcel deleted", body = MessageResponse))
)]
pub async fn delete_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .parcel_service
        .delete_parcel(parse_id(&id, "parcel")?)
        .await?;
    Ok(Json(MessageResponse::new("Parcel has been deleted!")))
}

/// Public tracking by parcel id
#[utoipa::path(
    get,
    path = "/api/v1/parcels/track/{tracking_id}",
    tag = "Tracking",
    params(("tracking_id" = String, Path, description = "Tracking id (the parcel id)")),
    responses(
        (status = 200, description = "`{ success: true, data }` with the parcel and its status label", body = TrackingView),
        (status = 400, description = "Invalid tracking ID format"),
        (status = 404, description = "Tracking ID not found")
    )
)]
pub async fn track_parcel(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
) -> Result<Json<ApiResponse<TrackingView>>, TrackingFailure> {
    let view = state
        .parcel_service
        .track(&tracking_id)
        .await
        .map_err(TrackingFailure)?;
    Ok(Json(ApiResponse::success(view)))
}

/// Dashboard counters: `delivered` counts status 3, `pending` counts status 1
#[utoipa::path(
    get,
    path = "/api/v1/parcels/stats/overview",
    tag = "Parcels",
    responses((status = 200, description = "Parcel counters", body = ParcelStats))
)]
pub async fn parcel_stats(State(state): State<AppState>) -> AppResult<Json<ParcelStats>> {
    Ok(Json(state.parcel_service.stats().await?))
}

/// Parcels sent by the signed-in customer. Admins may pass another email.
#[utoipa::path(
    post,
    path = "/api/v1/parcels/me",
    tag = "Parcels",
    request_body(content = MyParcelsRequest, description = "Optional sender email"),
    responses(
        (status = 200, description = "Parcels", body = Vec<Parcel>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Email belongs to someone else")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_parcels(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    OptionalJson(payload): OptionalJson<MyParcelsRequest>,
) -> AppResult<Json<Vec<Parcel>>> {
    let requested = payload
        .and_then(|body| body.email)
        .filter(|e| !e.trim().is_empty());

    let email = match requested {
        Some(email) if caller.may_view(&email) => email.trim().to_string(),
        Some(_) => return Err(AppError::Forbidden),
        None => caller.email.clone(),
    };

    Ok(Json(state.parcel_service.parcels_sent_by(&email).await?))
}
