use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        // Saturate rather than overflow on absurd page numbers; the resulting
        // OFFSET is simply past the end of the table.
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    VeryGood,
    Good,
    Acceptable,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like_new",
            Condition::VeryGood => "very_good",
            Condition::Good => "good",
            Condition::Acceptable => "acceptable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Inactive,
    Sold,
    Deleted,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Inactive => "inactive",
            ListingStatus::Sold => "sold",
            ListingStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListingQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub q: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub condition: Option<Condition>,
    pub seller_id: Option<Uuid>,
    pub sort: Option<ListingSort>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageBox {
    Inbox,
    Sent,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(rename = "box")]
    pub mailbox: Option<MessageBox>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub unread: Option<bool>,
}
