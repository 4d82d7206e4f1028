//! User administration.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::is_valid_role;
use crate::domain::{parse_id, UserChanges, UserResponse, UserRole, UserStats};
use crate::errors::{AppError, AppResult};
use crate::types::MessageResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "fullname must not be empty"))]
    pub fullname: Option<String>,
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<i32>,
    pub country: Option<String>,
    pub address: Option<String>,
    #[schema(example = "admin")]
    pub role: Option<String>,
}

impl UpdateUserRequest {
    fn into_changes(self) -> AppResult<UserChanges> {
        let role = match self.role.as_deref() {
            None => None,
            Some(role) if is_valid_role(role) => Some(UserRole::from(role)),
            Some(role) => {
                return Err(AppError::validation(format!(
                    "Invalid role '{}': expected user or admin",
                    role
                )))
            }
        };

        Ok(UserChanges {
            fullname: self.fullname,
            age: self.age,
            country: self.country,
            address: self.address,
            role,
            status: None,
        })
    }
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/stats/overview", get(user_stats))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// All users, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses((status = 200, description = "Users", body = Vec<UserResponse>))
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/stats/overview",
    tag = "Users",
    responses((status = 200, description = "User counters", body = UserStats))
)]
pub async fn user_stats(State(state): State<AppState>) -> AppResult<Json<UserStats>> {
    Ok(Json(state.user_service.stats().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(parse_id(&id, "user")?).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id, "user")?;
    let user = state
        .user_service
        .update_user(id, payload.into_changes()?)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(parse_id(&id, "user")?).await?;
    Ok(Json(MessageResponse::new("User has been deleted!")))
}
