//! Vendor endpoints.
//!
//! Everything except login needs a vendor token; the caller's id scopes
//! every food, order and offer operation.

use crate::{
    error::{ApiError, ApiResult},
    extractors::{
        collect_images, AuthVendor, NameFilter, OptionalJson, Pagination, ValidatedJson,
    },
    middleware::RateLimitLayer,
    responses::{
        views, ApiResponse, Created, FoodPageView, FoodView, OfferView, OrderView, TokenView,
        VendorPageView, VendorView,
    },
    state::AppState,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{get, patch, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use foodhub_application::services::{NewFood, OfferFields, ProcessOrder};
use foodhub_domain::{FoodId, OfferId, OfferType, OrderId, PromoType, VendorId, VendorProfilePatch};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Login request shared by every account kind.
///
/// The email is not format-checked so that every bad login gets the same answer.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Optional new position, applied only when both coordinates are present
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LocationRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Vendor profile changes; absent fields are left alone
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendorProfileRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub phone: Option<String>,

    pub food_type: Option<Vec<String>>,
}

impl From<UpdateVendorProfileRequest> for VendorProfilePatch {
    fn from(req: UpdateVendorProfileRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            phone: req.phone,
            food_type: req.food_type,
        }
    }
}

/// A menu item
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFoodRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub food_type: String,

    #[serde(default)]
    pub ready_time: u32,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[serde(default)]
    pub images: Vec<String>,
}

impl From<AddFoodRequest> for NewFood {
    fn from(req: AddFoodRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            category: req.category,
            food_type: req.food_type,
            ready_time: req.ready_time,
            price: req.price,
            images: req.images,
        }
    }
}

/// One food or a list of foods
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AddFoodBody {
    Many(Vec<AddFoodRequest>),
    One(AddFoodRequest),
}

impl Validate for AddFoodBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::One(food) => food.validate(),
            Self::Many(foods) => foods.iter().try_for_each(|food| food.validate()),
        }
    }
}

impl AddFoodBody {
    fn into_foods(self) -> Vec<NewFood> {
        match self {
            Self::One(food) => vec![food.into()],
            Self::Many(foods) => foods.into_iter().map(NewFood::from).collect(),
        }
    }
}

/// Order decision
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProcessOrderRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub remarks: String,

    /// Minutes until the order is ready
    pub time: Option<u32>,
}

/// Offer fields, used both to create and to overwrite an offer
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// `GENERIC` or `VENDOR`
    #[schema(value_type = String)]
    pub offer_type: OfferType,

    #[validate(range(min = 0.0))]
    pub offer_amount: f64,

    #[validate(length(min = 1))]
    pub pincode: String,

    pub promocode: Option<String>,

    /// `USER`, `ALL`, `BANK` or `CARD`
    #[serde(default)]
    #[schema(value_type = String)]
    pub promo_type: PromoType,

    pub start_validity: Option<DateTime<Utc>>,

    pub end_validity: Option<DateTime<Utc>>,

    #[serde(default)]
    pub bank: Vec<String>,

    #[serde(default)]
    pub bins: Vec<u32>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub min_value: f64,

    #[serde(default)]
    pub is_active: bool,
}

impl From<OfferRequest> for OfferFields {
    fn from(req: OfferRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            offer_type: req.offer_type,
            offer_amount: req.offer_amount,
            pincode: req.pincode,
            promocode: req.promocode,
            promo_type: req.promo_type,
            start_validity: req.start_validity,
            end_validity: req.end_validity,
            bank: req.bank,
            bins: req.bins,
            min_value: req.min_value,
            is_active: req.is_active,
        }
    }
}

/// Vendor routes; `login_limit` guards the login route
pub fn routes(login_limit: RateLimitLayer, multipart_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/vendor/login", post(login).layer(login_limit))
        .route("/vendor/getAll", get(list_vendors))
        .route("/vendor/profile", get(get_profile).patch(update_profile))
        .route(
            "/vendor/coverimage",
            patch(update_cover_images).layer(DefaultBodyLimit::max(multipart_limit)),
        )
        .route("/vendor/service", patch(toggle_service))
        .route("/vendor/food", get(list_foods).post(add_food))
        .route("/vendor/food/:id", get(get_food))
        .route("/vendor/orders", get(list_orders))
        .route("/vendor/order/:id", get(get_order))
        .route("/vendor/order/:id/process", put(process_order))
        .route("/vendor/offers", get(list_offers))
        .route("/vendor/offer", post(add_offer))
        .route("/vendor/offer/:id", put(edit_offer))
        .route("/vendor/:id", get(get_vendor))
}

/// Vendor login
#[utoipa::path(
    post,
    path = "/vendor/login",
    tag = "vendor",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token", body = TokenView),
        (status = 401, description = "Login credential is not valid"),
        (status = 429, description = "Too many attempts"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<TokenView>> {
    let token = state.vendors.login(&req.email, &req.password).await?;
    Ok(ApiResponse::success(TokenView { token }))
}

/// List vendors, optionally filtered by name
#[utoipa::path(
    get,
    path = "/vendor/getAll",
    tag = "vendor",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("name" = Option<String>, Query, description = "Case-insensitive name filter"),
    ),
    responses((status = 200, description = "One page of vendors", body = VendorPageView)),
    security(("bearer_auth" = []))
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    _vendor: AuthVendor,
    Pagination(page): Pagination,
    Query(filter): Query<NameFilter>,
) -> ApiResult<ApiResponse<VendorPageView>> {
    let result = state.vendors.list_vendors(filter.as_deref(), page).await?;
    Ok(ApiResponse::success(result.into()))
}

/// Get a vendor by id
#[utoipa::path(
    get,
    path = "/vendor/{id}",
    tag = "vendor",
    params(("id" = String, Path, description = "Vendor id")),
    responses(
        (status = 200, description = "Vendor found", body = VendorView),
        (status = 404, description = "Vendor not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    _vendor: AuthVendor,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<VendorView>> {
    let id: VendorId = id.parse()?;
    let vendor = state.vendors.get_vendor(id).await?;
    Ok(ApiResponse::success(vendor.into()))
}

/// The calling vendor
#[utoipa::path(
    get,
    path = "/vendor/profile",
    tag = "vendor",
    responses((status = 200, description = "Vendor profile", body = VendorView)),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    vendor: AuthVendor,
) -> ApiResult<ApiResponse<VendorView>> {
    let vendor = state.vendors.get_vendor(vendor.id).await?;
    Ok(ApiResponse::success(vendor.into()))
}

/// Update name, address, phone or food types
#[utoipa::path(
    patch,
    path = "/vendor/profile",
    tag = "vendor",
    request_body = UpdateVendorProfileRequest,
    responses((status = 200, description = "Saved profile", body = VendorView)),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    vendor: AuthVendor,
    ValidatedJson(req): ValidatedJson<UpdateVendorProfileRequest>,
) -> ApiResult<ApiResponse<VendorView>> {
    let vendor = state.vendors.update_profile(vendor.id, req.into()).await?;
    Ok(ApiResponse::success(vendor.into()))
}

/// Append cover images (multipart field `images`)
#[utoipa::path(
    patch,
    path = "/vendor/coverimage",
    tag = "vendor",
    responses(
        (status = 200, description = "Vendor with the new images", body = VendorView),
        (status = 400, description = "Unsupported format or too many files"),
        (status = 413, description = "File too large"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_cover_images(
    State(state): State<AppState>,
    vendor: AuthVendor,
    mut multipart: Multipart,
) -> ApiResult<ApiResponse<VendorView>> {
    let images = collect_images(&mut multipart, "images").await?;
    if images.is_empty() {
        return Err(ApiError::BadRequest("No images uploaded".to_string()));
    }
    let vendor = state.vendors.add_cover_images(vendor.id, images).await?;
    Ok(ApiResponse::success(vendor.into()))
}

/// Flip service availability
#[utoipa::path(
    patch,
    path = "/vendor/service",
    tag = "vendor",
    request_body = LocationRequest,
    responses((status = 200, description = "Vendor after the toggle", body = VendorView)),
    security(("bearer_auth" = []))
)]
pub async fn toggle_service(
    State(state): State<AppState>,
    vendor: AuthVendor,
    OptionalJson(location): OptionalJson<LocationRequest>,
) -> ApiResult<ApiResponse<VendorView>> {
    let vendor = state
        .vendors
        .toggle_service(vendor.id, location.lat, location.lng)
        .await?;
    Ok(ApiResponse::success(vendor.into()))
}

/// Add one food or a list of foods to the caller's menu
#[utoipa::path(
    post,
    path = "/vendor/food",
    tag = "vendor",
    request_body = AddFoodBody,
    responses(
        (status = 201, description = "Created foods", body = Vec<FoodView>),
        (status = 503, description = "Foods could not be attached to the vendor"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_food(
    State(state): State<AppState>,
    vendor: AuthVendor,
    ValidatedJson(body): ValidatedJson<AddFoodBody>,
) -> ApiResult<Created<Vec<FoodView>>> {
    let foods = state.foods.add_foods(vendor.id, body.into_foods()).await?;
    Ok(Created(views(foods)))
}

/// The caller's foods, filtered on name or description
#[utoipa::path(
    get,
    path = "/vendor/food",
    tag = "vendor",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-indexed)"),
        ("page_size" = Option<u32>, Query, description = "Items per page"),
        ("name" = Option<String>, Query, description = "Matches name or description"),
    ),
    responses((status = 200, description = "One page of foods", body = FoodPageView)),
    security(("bearer_auth" = []))
)]
pub async fn list_foods(
    State(state): State<AppState>,
    vendor: AuthVendor,
    Pagination(page): Pagination,
    Query(filter): Query<NameFilter>,
) -> ApiResult<ApiResponse<FoodPageView>> {
    let result = state
        .foods
        .list_foods(vendor.id, filter.as_deref(), page)
        .await?;
    Ok(ApiResponse::success(result.into()))
}

/// Get a food by id
#[utoipa::path(
    get,
    path = "/vendor/food/{id}",
    tag = "vendor",
    params(("id" = String, Path, description = "Food id")),
    responses(
        (status = 200, description = "Food found", body = FoodView),
        (status = 404, description = "Food not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_food(
    State(state): State<AppState>,
    _vendor: AuthVendor,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<FoodView>> {
    let id: FoodId = id.parse()?;
    let food = state.foods.get_food(id).await?;
    Ok(ApiResponse::success(food.into()))
}

/// Orders placed with the caller
#[utoipa::path(
    get,
    path = "/vendor/orders",
    tag = "vendor",
    responses((status = 200, description = "Orders with their foods", body = Vec<OrderView>)),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    vendor: AuthVendor,
) -> ApiResult<ApiResponse<Vec<OrderView>>> {
    let orders = state.orders.list_for_vendor(vendor.id).await?;
    Ok(ApiResponse::success(views(orders)))
}

/// One of the caller's orders
#[utoipa::path(
    get,
    path = "/vendor/order/{id}",
    tag = "vendor",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its foods", body = OrderView),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    vendor: AuthVendor,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<OrderView>> {
    let id: OrderId = id.parse()?;
    let order = state.orders.get_for_vendor(vendor.id, id).await?;
    Ok(ApiResponse::success(order.into()))
}

/// Set an order's status and remarks
#[utoipa::path(
    put,
    path = "/vendor/order/{id}/process",
    tag = "vendor",
    params(("id" = String, Path, description = "Order id")),
    request_body = ProcessOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderView),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn process_order(
    State(state): State<AppState>,
    vendor: AuthVendor,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ProcessOrderRequest>,
) -> ApiResult<ApiResponse<OrderView>> {
    let id: OrderId = id.parse()?;
    let decision = ProcessOrder {
        status: req.status,
        remarks: req.remarks,
        ready_time: req.time,
    };
    let order = state.orders.process(vendor.id, id, decision).await?;
    Ok(ApiResponse::success(order.into()))
}

/// Generic offers plus those listing the caller
#[utoipa::path(
    get,
    path = "/vendor/offers",
    tag = "vendor",
    responses((status = 200, description = "Visible offers", body = Vec<OfferView>)),
    security(("bearer_auth" = []))
)]
pub async fn list_offers(
    State(state): State<AppState>,
    vendor: AuthVendor,
) -> ApiResult<ApiResponse<Vec<OfferView>>> {
    let offers = state.offers.list_for_vendor(vendor.id).await?;
    Ok(ApiResponse::success(views(offers)))
}

/// Create an offer owned by the caller
#[utoipa::path(
    post,
    path = "/vendor/offer",
    tag = "vendor",
    request_body = OfferRequest,
    responses((status = 201, description = "Created offer", body = OfferView)),
    security(("bearer_auth" = []))
)]
pub async fn add_offer(
    State(state): State<AppState>,
    vendor: AuthVendor,
    ValidatedJson(req): ValidatedJson<OfferRequest>,
) -> ApiResult<Created<OfferView>> {
    let offer = state.offers.add(vendor.id, req.into()).await?;
    Ok(Created(offer.into()))
}

/// Overwrite an offer the caller is listed on
#[utoipa::path(
    put,
    path = "/vendor/offer/{id}",
    tag = "vendor",
    params(("id" = String, Path, description = "Offer id")),
    request_body = OfferRequest,
    responses(
        (status = 200, description = "Updated offer", body = OfferView),
        (status = 403, description = "Offer belongs to other vendors"),
        (status = 404, description = "Offer not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_offer(
    State(state): State<AppState>,
    vendor: AuthVendor,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<OfferRequest>,
) -> ApiResult<ApiResponse<OfferView>> {
    let id: OfferId = id.parse()?;
    let offer = state.offers.edit(vendor.id, id, req.into()).await?;
    Ok(ApiResponse::success(offer.into()))
}
