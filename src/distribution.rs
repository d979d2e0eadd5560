//! Profit Distribution Engine
//! Mission: Split sale profit evenly across all roles superior to the seller

use crate::hierarchy::{Role, RoleHierarchy};
use serde::{Deserialize, Serialize};

/// Fraction of the sale price allocated as distributable profit.
pub const DEFAULT_PROFIT_RATE: f64 = 0.25;

/// One superior role's share of the profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub role: Role,
    pub amount: f64,
}

/// Precondition violations. The engine refuses to compute rather than
/// produce a nonsensical distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    NonPositiveAmount(f64),
    InvalidProfitRate(f64),
}

impl std::fmt::Display for DistributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionError::NonPositiveAmount(a) => {
                write!(f, "Sale amount must be positive, got {}", a)
            }
            DistributionError::InvalidProfitRate(r) => {
                write!(f, "Profit rate must be within [0, 1], got {}", r)
            }
        }
    }
}

impl std::error::Error for DistributionError {}

/// Validate engine preconditions without computing anything. Exposed so
/// the orchestration can fail fast before it records a sale.
pub fn validate_inputs(sale_amount: f64, profit_rate: f64) -> Result<(), DistributionError> {
    if !(sale_amount > 0.0) {
        return Err(DistributionError::NonPositiveAmount(sale_amount));
    }
    if !(0.0..=1.0).contains(&profit_rate) || profit_rate.is_nan() {
        return Err(DistributionError::InvalidProfitRate(profit_rate));
    }
    Ok(())
}

/// Compute the profit split for one sale.
///
/// The total profit (`sale_amount * profit_rate`) is divided evenly among
/// all roles strictly superior to the seller, highest-to-lowest. A seller
/// holding the topmost rank (or an unrecognized role) gets an empty
/// distribution back: they keep the full profit, and that is not an error.
///
/// Pure function; rounding for display happens at the presentation layer
/// and is never fed back in.
pub fn distribute(
    sale_amount: f64,
    seller_role: &Role,
    hierarchy: &RoleHierarchy,
    profit_rate: f64,
) -> Result<Vec<DistributionEntry>, DistributionError> {
    validate_inputs(sale_amount, profit_rate)?;

    let superiors = hierarchy.superiors_of(seller_role);
    if superiors.is_empty() {
        return Ok(Vec::new());
    }

    let total_profit = sale_amount * profit_rate;
    let share = total_profit / superiors.len() as f64;

    Ok(superiors
        .iter()
        .map(|role| DistributionEntry {
            role: role.clone(),
            amount: share,
        })
        .collect())
}
