use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod listings;
pub mod messages;
pub mod notifications;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/listings", listings::router())
        .nest("/messages", messages::router())
        .nest("/notifications", notifications::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", admin::router())
}
