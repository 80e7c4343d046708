// Auth Service Library

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod telemetry;


pub use error::{ApiError, Result};
pub use routes::build_router;
pub use services::AuthService;
pub use store::{Credential, CredentialStore, InMemoryCredentialStore};

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}
