//! Sale Transaction Orchestration
//! Mission: Tie eligibility, inventory, and profit distribution into one transaction

use crate::auth::models::Account;
use crate::distribution::{self, DistributionEntry, DistributionError};
use crate::hierarchy::RoleHierarchy;
use crate::ledger::SaleLedger;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A catalog item. The demo catalog holds a single product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl Product {
    pub fn new(id: u32, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.quantity == 0
    }
}

/// Why a sale attempt was turned down. Recoverable; nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleRejection {
    AlreadySold,
    SoldOut,
}

impl std::fmt::Display for SaleRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleRejection::AlreadySold => write!(f, "This role can only sell one item per day"),
            SaleRejection::SoldOut => write!(f, "Sold Out"),
        }
    }
}

/// Outcome of a sale attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaleResult {
    Accepted {
        total_profit: f64,
        distribution: Vec<DistributionEntry>,
    },
    Rejected {
        reason: SaleRejection,
    },
}

/// Attempt to sell one unit of `product` on behalf of `account`.
///
/// The caller must hand in an already-authenticated account; credential
/// checks live at the auth boundary. On acceptance the sale is recorded
/// in the ledger BEFORE the distribution is computed, so a crash between
/// the two steps can never double-pay — `distribute` is pure and safe to
/// re-run from the recorded sale.
pub fn attempt_sale(
    account: &Account,
    product: &mut Product,
    ledger: &mut SaleLedger,
    hierarchy: &RoleHierarchy,
    profit_rate: f64,
) -> Result<SaleResult, DistributionError> {
    if product.is_sold_out() {
        return Ok(SaleResult::Rejected {
            reason: SaleRejection::SoldOut,
        });
    }

    if !ledger.can_sell(&account.role) {
        warn!(
            "🚫 Sale rejected for {} ({}): already sold this window",
            account.username, account.role
        );
        return Ok(SaleResult::Rejected {
            reason: SaleRejection::AlreadySold,
        });
    }

    // Fail fast on bad amount/rate before mutating anything.
    distribution::validate_inputs(product.price, profit_rate)?;

    // Record-then-compute. can_sell was checked above under the same
    // borrow, but the ledger has the final word.
    if ledger.record_sale(&account.role).is_err() {
        return Ok(SaleResult::Rejected {
            reason: SaleRejection::AlreadySold,
        });
    }
    product.quantity -= 1;

    let distribution = distribution::distribute(product.price, &account.role, hierarchy, profit_rate)?;
    let total_profit = product.price * profit_rate;

    info!(
        "💰 Sale accepted: {} ({}) sold {} for {} — profit {} across {} superiors",
        account.username,
        account.role,
        product.name,
        product.price,
        total_profit,
        distribution.len()
    );

    Ok(SaleResult::Accepted {
        total_profit,
        distribution,
    })
}
