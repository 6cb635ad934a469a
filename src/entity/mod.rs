pub mod audit_logs;
pub mod listings;
pub mod messages;
pub mod notifications;
pub mod reviews;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use listings::Entity as Listings;
pub use messages::Entity as Messages;
pub use notifications::Entity as Notifications;
pub use reviews::Entity as Reviews;
pub use users::Entity as Users;
