//! Authentication Module
//! Mission: Account registration, credential checks, and session tokens

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod store;

pub use api::AuthState;
pub use jwt::SessionTokens;
pub use middleware::auth_middleware;
pub use store::AccountStore;
