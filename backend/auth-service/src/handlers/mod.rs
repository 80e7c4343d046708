/// HTTP request handlers (REST API)
pub mod auth;

// Re-export handlers for easy access
pub use auth::{current_user, health_check, login};
