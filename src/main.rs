//! RoleSale - Role-Hierarchy Sales Commission Demo
//! Mission: One product, ten roles, profit split up the chain

use anyhow::{Context, Result};
use parking_lot::RwLock;
use rolesale_backend::{
    api::{create_router, AppState},
    auth::{AccountStore, AuthState, SessionTokens},
    config::Config,
    ledger::SaleLedger,
    sale::Product,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rolesale_backend=info,rolesale=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "🥖 Catalog: {} @ {} (x{}), profit rate {}",
        config.product_name, config.product_price, config.product_quantity, config.profit_rate
    );
    info!(
        "🏷️  Role hierarchy ({} tiers, highest first): {}",
        config.hierarchy.len(),
        config
            .hierarchy
            .roles()
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let hierarchy = Arc::new(config.hierarchy.clone());
    let accounts = Arc::new(AccountStore::new());
    let tokens = Arc::new(SessionTokens::new(config.jwt_secret.clone()));
    let ledger = Arc::new(RwLock::new(SaleLedger::new()));
    let catalog = Arc::new(RwLock::new(Product::new(
        1,
        config.product_name.clone(),
        config.product_price,
        config.product_quantity,
    )));

    let auth_state = AuthState::new(accounts.clone(), tokens.clone(), hierarchy.clone());
    let app_state = AppState {
        accounts,
        hierarchy,
        ledger,
        catalog,
        profit_rate: config.profit_rate,
    };

    let app = create_router(auth_state, app_state, tokens);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
