// Middleware module - Axum middleware

pub mod auth;
pub mod cors;

pub use auth::{admin_auth_middleware, AdminKey};
pub use cors::cors_layer;
