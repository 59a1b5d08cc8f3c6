//! Admin endpoints, guarded by the `x-admin-key` header.

use crate::{
    error::ApiResult,
    extractors::{AdminKey, NameFilter, Pagination, ValidatedJson},
    responses::{views, ApiResponse, Created, DeliveryView, VendorPageView, VendorView},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};
use foodhub_application::services::NewVendor;
use foodhub_domain::{DeliveryPersonId, VendorId};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Vendor creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub owner_name: String,

    #[serde(default)]
    pub food_type: Vec<String>,

    #[validate(length(min = 1, max = 20))]
    pub pincode: String,

    #[validate(length(min = 1, max = 500))]
    pub address: String,

    #[validate(length(min = 5, max = 20))]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

impl From<CreateVendorRequest> for NewVendor {
    fn from(req: CreateVendorRequest) -> Self {
        Self {
            name: req.name,
            owner_name: req.owner_name,
            food_type: req.food_type,
            pincode: req.pincode,
            address: req.address,
            phone: req.phone,
            email: req.email,
            password: req.password,
        }
    }
}

/// Verification decision for a delivery person
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyDeliveryRequest {
    #[validate(length(equal = 24))]
    pub id: String,

    pub status: bool,
}

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/vendor", post(create_vendor))
        .route("/admin/vendors", get(list_vendors))
        .route("/admin/vendor/:id", get(get_vendor))
        .route("/admin/delivery/users", get(list_delivery_users))
        .route("/admin/delivery/verify", put(verify_delivery_user))
}

/// Create a vendor account
#[utoipa::path(
    post,
    path = "/admin/vendor",
    tag = "admin",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = VendorView),
        (status = 409, description = "Email already registered"),
    ),
    security(("admin_key" = []))
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    _admin: AdminKey,
    ValidatedJson(req): ValidatedJson<CreateVendorRequest>,
) -> ApiResult<Created<VendorView>> {
    let vendor = state.vendors.create_vendor(req.into()).await?;
    Ok(Created(vendor.into()))
}

#[utoipa::path(
    get,
    path = "/admin/vendors",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("name" = Option<String>, Query, description = "Case-insensitive name filter"),
    ),
    responses((status = 200, description = "One page of vendors", body = VendorPageView)),
    security(("admin_key" = []))
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    _admin: AdminKey,
    Pagination(page): Pagination,
    Query(filter): Query<NameFilter>,
) -> ApiResult<ApiResponse<VendorPageView>> {
    let result = state.vendors.list_vendors(filter.as_deref(), page).await?;
    Ok(ApiResponse::success(result.into()))
}

#[utoipa::path(
    get,
    path = "/admin/vendor/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Vendor id")),
    responses(
        (status = 200, description = "Vendor found", body = VendorView),
        (status = 404, description = "Vendor not found"),
    ),
    security(("admin_key" = []))
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    _admin: AdminKey,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<VendorView>> {
    let id: VendorId = id.parse()?;
    let vendor = state.vendors.get_vendor(id).await?;
    Ok(ApiResponse::success(vendor.into()))
}

#[utoipa::path(
    get,
    path = "/admin/delivery/users",
    tag = "admin",
    responses((status = 200, description = "Every delivery person", body = Vec<DeliveryView>)),
    security(("admin_key" = []))
)]
pub async fn list_delivery_users(
    State(state): State<AppState>,
    _admin: AdminKey,
) -> ApiResult<ApiResponse<Vec<DeliveryView>>> {
    let people = state.delivery.list_all().await?;
    Ok(ApiResponse::success(views(people)))
}

/// Mark a delivery person verified or unverified
#[utoipa::path(
    put,
    path = "/admin/delivery/verify",
    tag = "admin",
    request_body = VerifyDeliveryRequest,
    responses(
        (status = 200, description = "Updated delivery person", body = DeliveryView),
        (status = 404, description = "Delivery user not found"),
    ),
    security(("admin_key" = []))
)]
pub async fn verify_delivery_user(
    State(state): State<AppState>,
    _admin: AdminKey,
    ValidatedJson(req): ValidatedJson<VerifyDeliveryRequest>,
) -> ApiResult<ApiResponse<DeliveryView>> {
    let id: DeliveryPersonId = req.id.parse()?;
    let person = state.delivery.set_verified(id, req.status).await?;
    Ok(ApiResponse::success(person.into()))
}
