use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        dashboard::{DashboardData, DashboardStats},
        listings::{CreateListingRequest, ListingDetail, ListingList, SellerProfile, UpdateListingRequest},
        messages::{MessageList, SendMessageRequest},
        notifications::NotificationList,
        reviews::{CreateReviewRequest, ReviewList, ReviewWithAuthor},
    },
    models::{Listing, Message, Notification, Review, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, dashboard, health, listings, messages, notifications, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        listings::list_listings,
        listings::create_listing,
        listings::get_listing,
        listings::update_listing,
        listings::delete_listing,
        listings::list_reviews,
        listings::add_review,
        messages::send_message,
        messages::list_messages,
        messages::mark_read,
        notifications::list_notifications,
        notifications::mark_read,
        dashboard::get_dashboard,
        admin::list_users,
        admin::set_verified,
    ),
    components(
        schemas(
            User,
            Listing,
            Review,
            Message,
            Notification,
            CreateListingRequest,
            UpdateListingRequest,
            ListingList,
            ListingDetail,
            SellerProfile,
            CreateReviewRequest,
            ReviewList,
            ReviewWithAuthor,
            SendMessageRequest,
            MessageList,
            NotificationList,
            DashboardData,
            DashboardStats,
            admin::UserList,
            admin::SetVerifiedRequest,
            params::Pagination,
            params::Condition,
            params::ListingStatus,
            params::ListingSort,
            params::MessageBox,
            params::ListingQuery,
            params::MessageListQuery,
            params::NotificationListQuery,
            Meta,
            ApiResponse<Listing>,
            ApiResponse<ListingList>,
            ApiResponse<ListingDetail>,
            ApiResponse<User>,
            ApiResponse<DashboardData>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Signup and login"),
        (name = "Listings", description = "Catalog search and listing CRUD"),
        (name = "Reviews", description = "Listing reviews"),
        (name = "Messages", description = "Buyer/seller messaging"),
        (name = "Notifications", description = "User notifications"),
        (name = "Dashboard", description = "Seller dashboard"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
