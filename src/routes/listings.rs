use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::listings::{CreateListingRequest, ListingDetail, ListingList, UpdateListingRequest},
    dto::reviews::{CreateReviewRequest, ReviewList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Listing, Review},
    response::ApiResponse,
    routes::params::{ListingQuery, Pagination},
    services::{listing_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route(
            "/{slug}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/{slug}/reviews", get(list_reviews).post(add_review))
}

#[utoipa::path(
    get,
    path = "/api/listings",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in title and description"),
        ("min_price" = Option<i64>, Query, description = "Minimum price in cents"),
        ("max_price" = Option<i64>, Query, description = "Maximum price in cents"),
        ("condition" = Option<String>, Query, description = "Condition grade filter"),
        ("seller_id" = Option<Uuid>, Query, description = "Filter by seller"),
        ("sort" = Option<String>, Query, description = "newest, oldest, price_asc, price_desc"),
    ),
    responses(
        (status = 200, description = "Search the catalog", body = ApiResponse<ListingList>)
    ),
    tag = "Listings"
)]
pub async fn list_listings(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<ApiResponse<ListingList>>> {
    let resp = listing_service::search_listings(&state, viewer.as_ref(), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Create listing", body = ApiResponse<Listing>),
        (status = 409, description = "Slug already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateListingRequest>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let resp = listing_service::create_listing(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/listings/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    responses(
        (status = 200, description = "Listing detail with seller and reviews", body = ApiResponse<ListingDetail>),
        (status = 404, description = "Listing not found"),
    ),
    tag = "Listings"
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ListingDetail>>> {
    let resp = listing_service::get_listing(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/listings/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Updated listing", body = ApiResponse<Listing>),
        (status = 403, description = "Not the seller"),
        (status = 404, description = "Listing not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn update_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateListingRequest>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let resp = listing_service::update_listing(&state, &user, &slug, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/listings/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    responses(
        (status = 200, description = "Listing soft-deleted"),
        (status = 403, description = "Not the seller"),
        (status = 404, description = "Listing not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn delete_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = listing_service::delete_listing(&state, &user, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/listings/{slug}/reviews",
    params(
        ("slug" = String, Path, description = "Listing slug"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List reviews", body = ApiResponse<ReviewList>),
        (status = 404, description = "Listing not found"),
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, &slug, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/listings/{slug}/reviews",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Create review", body = ApiResponse<Review>),
        (status = 400, description = "Invalid rating or own listing"),
        (status = 409, description = "Already reviewed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::add_review(&state, &user, &slug, payload).await?;
    Ok(Json(resp))
}
