//! Branch directory routes.

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
use crate::domain::{parse_id, Branch, BranchChanges, NewBranch};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, MessageResponse, RequiredFields};

/// All five fields are required; they are optional here so a single 400 can
/// name every one that is missing.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateBranchRequest {
    #[schema(example = "Westlands Hub")]
    pub name: Option<String>,
    #[schema(example = "Nairobi")]
    pub city: Option<String>,
    #[schema(example = "Nairobi County")]
    pub state: Option<String>,
    #[schema(example = "Waiyaki Way 12")]
    pub address: Option<String>,
    #[schema(example = "+254700000000")]
    pub phone: Option<String>,
}

impl CreateBranchRequest {
    fn into_new_branch(self) -> AppResult<NewBranch> {
        let mut required = RequiredFields::new();
        let branch = NewBranch {
            name: required.text("name", self.name),
            city: required.text("city", self.city),
            state: required.text("state", self.state),
            address: required.text("address", self.address),
            phone: required.text("phone", self.phone),
        };
        required.finish()?;
        Ok(branch)
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBranchRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl UpdateBranchRequest {
    fn into_changes(self) -> AppResult<BranchChanges> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("name must not be empty"));
        }
        Ok(BranchChanges {
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
        })
    }
}

pub fn branch_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_branches).post(create_branch))
        .route("/:id", get(get_branch).put(update_branch).delete(delete_branch))
}

#[utoipa::path(
    post,
    path = "/api/v1/branches",
    tag = "Branches",
    request_body = CreateBranchRequest,
    responses(
        (status = 201, description = "Branch created", body = Branch),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Branch name taken")
    )
)]
pub async fn create_branch(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBranchRequest>,
) -> AppResult<Created<Branch>> {
    let branch = state
        .branch_service
        .create_branch(payload.into_new_branch()?)
        .await?;
    Ok(Created(branch))
}

/// Every branch, newest first
#[utoipa::path(
    get,
    path = "/api/v1/branches",
    tag = "Branches",
    responses((status = 200, description = "Branches", body = Vec<Branch>))
)]
pub async fn list_branches(State(state): State<AppState>) -> AppResult<Json<Vec<Branch>>> {
    Ok(Json(state.branch_service.list_branches().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/branches/{id}",
    tag = "Branches",
    params(("id" = String, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch", body = Branch),
        (status = 404, description = "Branch not found")
    )
)]
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Branch>> {
    let branch = state
        .branch_service
        .get_branch(parse_id(&id, "branch")?)
        .await?;
    Ok(Json(branch))
}

#[utoipa::path(
    put,
    path = "/api/v1/branches/{id}",
    tag = "Branches",
    params(("id" = String, Path, description = "Branch id")),
    request_body = UpdateBranchRequest,
    responses(
        (status = 200, description = "Updated branch", body = Branch),
        (status = 404, description = "Branch not found"),
        (status = 409, description = "Branch name taken")
    )
)]
pub async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBranchRequest>,
) -> AppResult<Json<Branch>> {
    let id = parse_id(&id, "branch")?;
    let branch = state
        .branch_service
        .update_branch(id, payload.into_changes()?)
        .await?;
    Ok(Json(branch))
}

#[utoipa::path(
    delete,
    path = "/api/v1/branches/{id}",
    tag = "Branches",
    params(("id" = String, Path, description = "Branch id")),
    responses((status = 200, description = "Branch deleted", body = MessageResponse))
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .branch_service
        .delete_branch(parse_id(&id, "branch")?)
        .await?;
    Ok(Json(MessageResponse::new("Branch has been deleted!")))
}
