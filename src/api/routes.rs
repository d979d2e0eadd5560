//! Sale API Routes
//! Mission: Expose product, roles, ledger, and the sell action over HTTP

use crate::auth::middleware::extract_claims;
use crate::auth::store::AccountStore;
use crate::auth::{api as auth_api, auth_middleware, AuthState, SessionTokens};
use crate::distribution::DistributionEntry;
use crate::hierarchy::RoleHierarchy;
use crate::ledger::{SaleLedger, SaleRecord};
use crate::sale::{self, Product, SaleRejection, SaleResult};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountStore>,
    pub hierarchy: Arc<RoleHierarchy>,
    pub ledger: Arc<RwLock<SaleLedger>>,
    pub catalog: Arc<RwLock<Product>>,
    pub profit_rate: f64,
}

/// Assemble the full application router: public health check, open
/// signup/login, and token-protected sale endpoints.
pub fn create_router(
    auth_state: AuthState,
    app_state: AppState,
    tokens: Arc<SessionTokens>,
) -> Router {
    let auth_router = Router::new()
        .route("/api/auth/signup", post(auth_api::signup))
        .route("/api/auth/login", post(auth_api::login))
        .with_state(auth_state.clone());

    let session_router = Router::new()
        .route("/api/auth/me", get(auth_api::get_current_account))
        .route_layer(middleware::from_fn_with_state(
            tokens.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    let protected_routes = Router::new()
        .route("/api/product", get(get_product))
        .route("/api/roles", get(get_roles))
        .route("/api/sales", get(get_sales))
        .route("/api/sale", post(post_sale))
        .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
        .with_state(app_state);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(auth_router)
        .merge(session_router)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
}

// ===== Route Handlers =====

/// Health check endpoint - GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get the demo product - GET /api/product
pub async fn get_product(State(state): State<AppState>) -> Json<Product> {
    Json(state.catalog.read().clone())
}

/// List the role hierarchy with ranks - GET /api/roles
pub async fn get_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles = state
        .hierarchy
        .roles()
        .iter()
        .map(|role| RoleInfo {
            role: role.as_str().to_string(),
            label: role.display_name(),
            rank: state.hierarchy.rank_of(role).unwrap_or_default(),
            superiors: state.hierarchy.superiors_of(role).len(),
        })
        .collect();

    Json(RolesResponse { roles })
}

/// List recorded sales - GET /api/sales
pub async fn get_sales(State(state): State<AppState>) -> Json<SalesResponse> {
    let ledger = state.ledger.read();
    Json(SalesResponse {
        count: ledger.len(),
        sales: ledger.records().to_vec(),
    })
}

/// Sell one unit as the current session user - POST /api/sale
pub async fn post_sale(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<SaleResponse>, ApiError> {
    let claims = extract_claims(&req).ok_or(ApiError::Unauthorized)?;

    // The token vouches for the session; the store still owns the account
    let account = state
        .accounts
        .get_by_username(&claims.username)
        .ok_or(ApiError::Unauthorized)?;

    // One lock scope for the whole transaction: the ledger is the
    // serialization point for the one-sale-per-role invariant.
    let result = {
        let mut ledger = state.ledger.write();
        let mut product = state.catalog.write();
        sale::attempt_sale(
            &account,
            &mut product,
            &mut ledger,
            &state.hierarchy,
            state.profit_rate,
        )
        .map_err(|e| ApiError::Precondition(e.to_string()))?
    };

    match result {
        SaleResult::Accepted {
            total_profit,
            distribution,
        } => Ok(Json(SaleResponse {
            seller: account.username.clone(),
            role: account.role.as_str().to_string(),
            total_profit,
            distribution: distribution.iter().map(DistributionView::from_entry).collect(),
            message: if distribution.is_empty() {
                "No superior roles to distribute profit to. You keep the full profit!".to_string()
            } else {
                "Profit distributed".to_string()
            },
        })),
        SaleResult::Rejected { reason } => Err(match reason {
            SaleRejection::AlreadySold => ApiError::AlreadySold,
            SaleRejection::SoldOut => ApiError::SoldOut,
        }),
    }
}

// ===== Request/Response Types =====

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
pub struct RoleInfo {
    role: String,
    label: String,
    rank: usize,
    superiors: usize,
}

#[derive(Serialize)]
pub struct RolesResponse {
    roles: Vec<RoleInfo>,
}

#[derive(Serialize)]
pub struct SalesResponse {
    count: usize,
    sales: Vec<SaleRecord>,
}

/// One row of the distribution table as the UI renders it.
#[derive(Serialize)]
pub struct DistributionView {
    role: String,
    receiver: String,
    /// Rounded for display only; the engine's exact amounts are never
    /// re-derived from this.
    amount: f64,
}

impl DistributionView {
    fn from_entry(entry: &DistributionEntry) -> Self {
        Self {
            role: entry.role.as_str().to_string(),
            receiver: entry.role.display_name(),
            amount: (entry.amount * 100.0).round() / 100.0,
        }
    }
}

#[derive(Serialize)]
pub struct SaleResponse {
    seller: String,
    role: String,
    total_profit: f64,
    distribution: Vec<DistributionView>,
    message: String,
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    AlreadySold,
    SoldOut,
    Precondition(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            ApiError::AlreadySold => (
                StatusCode::CONFLICT,
                "This role can only sell one item per day".to_string(),
            ),
            ApiError::SoldOut => (StatusCode::CONFLICT, "Sold Out".to_string()),
            ApiError::Precondition(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
