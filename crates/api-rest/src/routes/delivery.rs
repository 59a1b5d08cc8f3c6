//! Delivery personnel endpoints.

use super::{customer::UpdatePersonProfileRequest, vendor::LocationRequest, vendor::LoginRequest};
use crate::{
    error::ApiResult,
    extractors::{AuthDelivery, OptionalJson, ValidatedJson},
    middleware::RateLimitLayer,
    responses::{ApiResponse, Created, DeliveryView, TokenView},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use foodhub_application::services::NewAccount;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Delivery person registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeliverySignupRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 5, max = 20))]
    pub phone: String,

    #[validate(length(min = 1, max = 20))]
    pub pincode: String,
}

/// Delivery routes; `login_limit` guards the login route
pub fn routes(login_limit: RateLimitLayer) -> Router<AppState> {
    Router::new()
        .route("/delivery/signup", post(signup))
        .route("/delivery/login", post(login).layer(login_limit))
        .route("/delivery/profile", get(get_profile).patch(update_profile))
        .route("/delivery/change-status", put(change_status))
}

/// Register a delivery person
#[utoipa::path(
    post,
    path = "/delivery/signup",
    tag = "delivery",
    request_body = DeliverySignupRequest,
    responses(
        (status = 201, description = "Account created", body = TokenView),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DeliverySignupRequest>,
) -> ApiResult<Created<TokenView>> {
    let account = NewAccount {
        email: req.email,
        password: req.password,
        phone: req.phone,
    };
    let token = state.delivery.signup(account, req.pincode).await?;
    Ok(Created(TokenView { token }))
}

/// Delivery login
#[utoipa::path(
    post,
    path = "/delivery/login",
    tag = "delivery",
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
    let token = state.delivery.login(&req.email, &req.password).await?;
    Ok(ApiResponse::success(TokenView { token }))
}

#[utoipa::path(
    get,
    path = "/delivery/profile",
    tag = "delivery",
    responses((status = 200, description = "Delivery profile", body = DeliveryView)),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    person: AuthDelivery,
) -> ApiResult<ApiResponse<DeliveryView>> {
    let person = state.delivery.profile(person.id).await?;
    Ok(ApiResponse::success(person.into()))
}

#[utoipa::path(
    patch,
    path = "/delivery/profile",
    tag = "delivery",
    request_body = UpdatePersonProfileRequest,
    responses((status = 200, description = "Saved profile", body = DeliveryView)),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    person: AuthDelivery,
    ValidatedJson(req): ValidatedJson<UpdatePersonProfileRequest>,
) -> ApiResult<ApiResponse<DeliveryView>> {
    let person = state.delivery.update_profile(person.id, req.into()).await?;
    Ok(ApiResponse::success(person.into()))
}

/// Flip availability, optionally moving the stored position
#[utoipa::path(
    put,
    path = "/delivery/change-status",
    tag = "delivery",
    request_body = LocationRequest,
    responses((status = 200, description = "Delivery person after the toggle", body = DeliveryView)),
    security(("bearer_auth" = []))
)]
pub async fn change_status(
    State(state): State<AppState>,
    person: AuthDelivery,
    OptionalJson(location): OptionalJson<LocationRequest>,
) -> ApiResult<ApiResponse<DeliveryView>> {
    let person = state
        .delivery
        .toggle_status(person.id, location.lat, location.lng)
        .await?;
    Ok(ApiResponse::success(person.into()))
}
