//! Customer endpoints.

use super::vendor::LoginRequest;
use crate::{
    error::ApiResult,
    extractors::{AuthCustomer, ValidatedJson},
    middleware::RateLimitLayer,
    responses::{views, ApiResponse, Created, CustomerView, OrderView, TokenView},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use foodhub_application::services::NewAccount;
use foodhub_domain::PersonProfilePatch;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Customer registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 5, max = 20))]
    pub phone: String,
}

impl From<SignupRequest> for NewAccount {
    fn from(req: SignupRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            phone: req.phone,
        }
    }
}

/// Profile changes for customers and delivery people; absent fields are left alone
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
}

impl From<UpdatePersonProfileRequest> for PersonProfilePatch {
    fn from(req: UpdatePersonProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            address: req.address,
        }
    }
}

/// Customer routes; `login_limit` guards the login route
pub fn routes(login_limit: RateLimitLayer) -> Router<AppState> {
    Router::new()
        .route("/customer/signup", post(signup))
        .route("/customer/login", post(login).layer(login_limit))
        .route("/customer/profile", get(get_profile).patch(update_profile))
        .route("/customer/orders", get(list_orders))
}

/// Register a customer
#[utoipa::path(
    post,
    path = "/customer/signup",
    tag = "customer",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = TokenView),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<TokenView>> {
    let token = state.customers.signup(req.into()).await?;
    Ok(Created(TokenView { token }))
}

/// Customer login
#[utoipa::path(
    post,
    path = "/customer/login",
    tag = "customer",
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
    let token = state.customers.login(&req.email, &req.password).await?;
    Ok(ApiResponse::success(TokenView { token }))
}

/// The calling customer
#[utoipa::path(
    get,
    path = "/customer/profile",
    tag = "customer",
    responses((status = 200, description = "Customer profile", body = CustomerView)),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    customer: AuthCustomer,
) -> ApiResult<ApiResponse<CustomerView>> {
    let customer = state.customers.profile(customer.id).await?;
    Ok(ApiResponse::success(customer.into()))
}

/// Update names or address
#[utoipa::path(
    patch,
    path = "/customer/profile",
    tag = "customer",
    request_body = UpdatePersonProfileRequest,
    responses((status = 200, description = "Saved profile", body = CustomerView)),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    customer: AuthCustomer,
    ValidatedJson(req): ValidatedJson<UpdatePersonProfileRequest>,
) -> ApiResult<ApiResponse<CustomerView>> {
    let customer = state
        .customers
        .update_profile(customer.id, req.into())
        .await?;
    Ok(ApiResponse::success(customer.into()))
}

/// Orders placed by the caller
#[utoipa::path(
    get,
    path = "/customer/orders",
    tag = "customer",
    responses((status = 200, description = "Orders with their foods", body = Vec<OrderView>)),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    customer: AuthCustomer,
) -> ApiResult<ApiResponse<Vec<OrderView>>> {
    let orders = state.orders.list_for_customer(customer.id).await?;
    Ok(ApiResponse::success(views(orders)))
}
