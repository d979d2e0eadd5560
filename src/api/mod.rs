//! API Module
//! Mission: HTTP surface for the sales demo

pub mod routes;

pub use routes::{create_router, AppState};
