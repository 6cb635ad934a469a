pub mod auth;
pub mod dashboard;
pub mod listings;
pub mod messages;
pub mod notifications;
pub mod reviews;
