/// Request extractors for protected routes
pub mod jwt_auth;

pub use jwt_auth::AuthenticatedUser;
