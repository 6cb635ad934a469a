use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::reviews::ReviewWithAuthor,
    models::{Listing, User},
    routes::params::{Condition, ListingStatus},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub condition: Condition,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub condition: Option<Condition>,
    pub images: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingList {
    pub items: Vec<Listing>,
}

/// Seller block on the listing detail page.
#[derive(Debug, Serialize, ToSchema)]
pub struct SellerProfile {
    #[serde(flatten)]
    pub user: User,
    pub active_listings: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDetail {
    pub listing: Listing,
    pub seller: SellerProfile,
    pub reviews: Vec<ReviewWithAuthor>,
}
