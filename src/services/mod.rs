pub mod admin_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod listing_service;
pub mod message_service;
pub mod notification_service;
pub mod review_service;
