//! Public browsing by pincode. Empty results are a 404.

use crate::{
    error::ApiResult,
    responses::{views, ApiResponse, FoodView, OfferView, RestaurantView, VendorView},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use foodhub_domain::VendorId;

/// Shopping routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shopping/:pincode", get(availability))
        .route("/shopping/top-restaurants/:pincode", get(top_restaurants))
        .route("/shopping/foods-in-30-min/:pincode", get(foods_in_30_min))
        .route("/shopping/search/:pincode", get(search_foods))
        .route("/shopping/offers/:pincode", get(offers))
        .route("/shopping/restaurant/:id", get(restaurant))
}

/// Vendors serving the pincode, best rated first
#[utoipa::path(
    get,
    path = "/shopping/{pincode}",
    tag = "shopping",
    params(("pincode" = String, Path, description = "Delivery pincode")),
    responses(
        (status = 200, description = "Available vendors", body = Vec<VendorView>),
        (status = 404, description = "Data not found"),
    )
)]
pub async fn availability(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> ApiResult<ApiResponse<Vec<VendorView>>> {
    let vendors = state.shopping.availability(&pincode).await?;
    Ok(ApiResponse::success(views(vendors)))
}

/// The ten best rated vendors serving the pincode
#[utoipa::path(
    get,
    path = "/shopping/top-restaurants/{pincode}",
    tag = "shopping",
    params(("pincode" = String, Path, description = "Delivery pincode")),
    responses(
        (status = 200, description = "Top vendors", body = Vec<VendorView>),
        (status = 404, description = "Data not found"),
    )
)]
pub async fn top_restaurants(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> ApiResult<ApiResponse<Vec<VendorView>>> {
    let vendors = state.shopping.top_restaurants(&pincode).await?;
    Ok(ApiResponse::success(views(vendors)))
}

/// Foods ready within 30 minutes
#[utoipa::path(
    get,
    path = "/shopping/foods-in-30-min/{pincode}",
    tag = "shopping",
    params(("pincode" = String, Path, description = "Delivery pincode")),
    responses(
        (status = 200, description = "Quick foods", body = Vec<FoodView>),
        (status = 404, description = "Data not found"),
    )
)]
pub async fn foods_in_30_min(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> ApiResult<ApiResponse<Vec<FoodView>>> {
    let foods = state.shopping.foods_in_30_min(&pincode).await?;
    Ok(ApiResponse::success(views(foods)))
}

#[utoipa::path(
    get,
    path = "/shopping/search/{pincode}",
    tag = "shopping",
    params(("pincode" = String, Path, description = "Delivery pincode")),
    responses(
        (status = 200, description = "Every food on offer", body = Vec<FoodView>),
        (status = 404, description = "Data not found"),
    )
)]
pub async fn search_foods(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> ApiResult<ApiResponse<Vec<FoodView>>> {
    let foods = state.shopping.search_foods(&pincode).await?;
    Ok(ApiResponse::success(views(foods)))
}

#[utoipa::path(
    get,
    path = "/shopping/offers/{pincode}",
    tag = "shopping",
    params(("pincode" = String, Path, description = "Delivery pincode")),
    responses(
        (status = 200, description = "Active offers", body = Vec<OfferView>),
        (status = 404, description = "Data not found"),
    )
)]
pub async fn offers(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> ApiResult<ApiResponse<Vec<OfferView>>> {
    let offers = state.shopping.offers(&pincode).await?;
    Ok(ApiResponse::success(views(offers)))
}

/// A vendor with its menu
#[utoipa::path(
    get,
    path = "/shopping/restaurant/{id}",
    tag = "shopping",
    params(("id" = String, Path, description = "Vendor id")),
    responses(
        (status = 200, description = "Vendor and foods", body = RestaurantView),
        (status = 404, description = "Data not found"),
    )
)]
pub async fn restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<RestaurantView>> {
    let id: VendorId = id.parse()?;
    let restaurant = state.shopping.restaurant(id).await?;
    Ok(ApiResponse::success(restaurant.into()))
}
