//! Application builder.
//!
//! Assembles routes, static files, documentation and middleware into one
//! Axum router.

use crate::{
    error::ErrorResponse,
    middleware::{
        handle_panic, handle_timeout, logging_middleware, not_found, request_id_middleware,
        RateLimitLayer,
    },
    responses, routes,
    routes::{admin, customer, delivery, health, shopping, upload, vendor},
    state::AppState,
};
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::HeaderValue,
    middleware, Router,
};
use foodhub_common::config::ServerConfig;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let login_limit = RateLimitLayer::with_config((&config.rate_limit).into());

    let images =
        ServeDir::new(&config.storage.images_dir).not_found_service(not_found.into_service());

    let mut app = routes::routes(login_limit, config.storage.max_upload_bytes)
        .fallback(not_found)
        .with_state(state)
        .nest_service("/images", images);

    if config.server.enable_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(build_cors_layer(&config.server))
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(config.request_timeout()))
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn(logging_middleware)),
        )
}

/// Build CORS layer from configuration
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

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
                        .build(),
                ),
            );
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-admin-key"))),
            );
        }
    }
}

/// OpenAPI document served at `/api-docs/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FoodHub API",
        version = "1.0.0",
        description = "REST API for the FoodHub food delivery marketplace",
        license(name = "MIT"),
    ),
    paths(
        health::health,
        health::ready,
        vendor::login,
        vendor::list_vendors,
        vendor::get_vendor,
        vendor::get_profile,
        vendor::update_profile,
        vendor::update_cover_images,
        vendor::toggle_service,
        vendor::add_food,
        vendor::list_foods,
        vendor::get_food,
        vendor::list_orders,
        vendor::get_order,
        vendor::process_order,
        vendor::list_offers,
        vendor::add_offer,
        vendor::edit_offer,
        customer::signup,
        customer::login,
        customer::get_profile,
        customer::update_profile,
        customer::list_orders,
        delivery::signup,
        delivery::login,
        delivery::get_profile,
        delivery::update_profile,
        delivery::change_status,
        admin::create_vendor,
        admin::list_vendors,
        admin::get_vendor,
        admin::list_delivery_users,
        admin::verify_delivery_user,
        shopping::availability,
        shopping::top_restaurants,
        shopping::foods_in_30_min,
        shopping::search_foods,
        shopping::offers,
        shopping::restaurant,
        upload::upload,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        health::ReadinessResponse,
        responses::TokenView,
        responses::VendorView,
        responses::VendorPageView,
        responses::FoodView,
        responses::FoodPageView,
        responses::OrderLineView,
        responses::OrderView,
        responses::OfferView,
        responses::CustomerView,
        responses::DeliveryView,
        responses::RestaurantView,
        responses::UploadView,
        vendor::LoginRequest,
        vendor::LocationRequest,
        vendor::UpdateVendorProfileRequest,
        vendor::AddFoodRequest,
        vendor::AddFoodBody,
        vendor::ProcessOrderRequest,
        vendor::OfferRequest,
        customer::SignupRequest,
        customer::UpdatePersonProfileRequest,
        delivery::DeliverySignupRequest,
        admin::CreateVendorRequest,
        admin::VerifyDeliveryRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "vendor", description = "Vendor accounts, menus, orders and offers"),
        (name = "customer", description = "Customer accounts"),
        (name = "delivery", description = "Delivery personnel"),
        (name = "admin", description = "Administration, guarded by x-admin-key"),
        (name = "shopping", description = "Public browsing by pincode"),
        (name = "upload", description = "Image uploads"),
    )
)]
pub struct ApiDoc;
