use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::{
    dto::dashboard::{DashboardData, DashboardStats},
    entity::listings::{Column, Entity as Listings},
    entity::messages,
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::ListingStatus,
    services::listing_service::listing_from_entity,
    state::AppState,
};

pub async fn get_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardData>> {
    let rows = Listings::find()
        .filter(Column::SellerId.eq(user.user_id))
        .filter(Column::Status.ne(ListingStatus::Deleted.as_str()))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut active_listings = 0;
    let mut sold_listings = 0;
    let mut total_views = 0;
    for row in &rows {
        if row.status == ListingStatus::Active.as_str() {
            active_listings += 1;
        }
        if row.status == ListingStatus::Sold.as_str() {
            sold_listings += 1;
        }
        total_views += row.views;
    }

    let (review_count, average_rating): (i64, Option<f64>) = sqlx::query_as(
        r#"
        SELECT count(*), avg(r.rating)::float8
        FROM reviews r
        JOIN listings l ON l.id = r.listing_id
        WHERE l.seller_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let unread_messages = messages::Entity::find()
        .filter(messages::Column::ReceiverId.eq(user.user_id))
        .filter(messages::Column::Read.eq(false))
        .count(&state.orm)
        .await? as i64;

    let stats = DashboardStats {
        active_listings,
        sold_listings,
        total_views,
        review_count,
        average_rating: average_rating.unwrap_or(0.0),
        unread_messages,
    };
    let data = DashboardData {
        listings: rows.into_iter().map(listing_from_entity).collect(),
        stats,
    };

    Ok(ApiResponse::success("Dashboard", data, Some(Meta::empty())))
}
