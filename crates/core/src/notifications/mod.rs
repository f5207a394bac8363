pub mod notifications_model;
pub mod notifications_service;

pub use notifications_model::{classify_due_date, AlertSource, AlertUrgency, DueAlert};
pub use notifications_service::NotificationService;
