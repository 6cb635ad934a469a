use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Listing;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub active_listings: i64,
    pub sold_listings: i64,
    pub total_views: i64,
    pub review_count: i64,
    pub average_rating: f64,
    pub unread_messages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardData {
    pub listings: Vec<Listing>,
    pub stats: DashboardStats,
}
