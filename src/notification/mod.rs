pub mod dispatcher;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod registry;

pub use dispatcher::NotificationDispatcher;
pub use notification_models::Notification;
pub use notification_repository::NotificationRepository;
pub use registry::SubscriberRegistry;
