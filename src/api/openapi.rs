//! OpenAPI document served by Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, branch_handler, order_handler, parcel_handler, user_handler,
};
use crate::domain::{
    Branch, BranchRef, Order, OrderDetails, OrderStatus, Parcel, ParcelStats, TrackingView,
    UserResponse, UserStats,
};
use crate::services::{ApprovalOutcome, ApprovalRequest, LoginResponse};
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SendIT API",
        version = "0.1.0",
        description = "Parcel delivery: branches, booking requests, order approval and tracking",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "SendIT Support", email = "sendit@outlook.com")
    ),
    servers((url = "http://localhost:5000", description = "Local development server")),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::list_users,
        user_handler::user_stats,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        branch_handler::create_branch,
        branch_handler::list_branches,
        branch_handler::get_branch,
        branch_handler::update_branch,
        branch_handler::delete_branch,
        order_handler::create_order,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::update_order,
        order_handler::reject_order,
        order_handler::approve_order,
        parcel_handler::create_parcel,
        parcel_handler::list_parcels,
        parcel_handler::get_parcel,
        parcel_handler::update_parcel,
        parcel_handler::delete_parcel,
        parcel_handler::track_parcel,
        parcel_handler::parcel_stats,
        parcel_handler::my_parcels,
    ),
    components(
        schemas(
            Branch,
            BranchRef,
            Order,
            OrderDetails,
            OrderStatus,
            Parcel,
            ParcelStats,
            TrackingView,
            UserResponse,
            UserStats,
            MessageResponse,
            LoginResponse,
            ApprovalRequest,
            ApprovalOutcome,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::UpdateUserRequest,
            branch_handler::CreateBranchRequest,
            branch_handler::UpdateBranchRequest,
            order_handler::CreateOrderRequest,
            order_handler::OrderCreatedResponse,
            order_handler::UpdateOrderStatusRequest,
            parcel_handler::CreateParcelRequest,
            parcel_handler::UpdateParcelRequest,
            parcel_handler::MyParcelsRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "User administration"),
        (name = "Branches", description = "Branch directory"),
        (name = "Orders", description = "Booking requests and approval"),
        (name = "Parcels", description = "Parcel records"),
        (name = "Tracking", description = "Public parcel tracking")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
