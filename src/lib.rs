//! User-account management service.
//!
//! Thin orchestration over a relational user store and an outbound email
//! notifier: create, fetch, partial update, count, plus unique nickname
//! generation and first-user-becomes-admin bootstrap.

pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod users;

pub use error::UserServiceError;
pub use notify::{LogNotifier, NotificationGateway};
pub use users::model::{User, UserRole};
pub use users::service::UserAccountService;
pub use users::store::{StoreError, UserStore};
