//! Sale Eligibility Ledger
//! Mission: Enforce at most one sale per role per session window

use crate::hierarchy::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A completed sale, stamped when the ledger accepted it.
#[derive(Debug, Clone, Serialize)]
pub struct SaleRecord {
    pub role: Role,
    pub timestamp: DateTime<Utc>,
}

/// Returned when a role attempts a second sale within the window.
/// The rejection is idempotent: ledger state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadySoldError {
    pub role: Role,
}

impl std::fmt::Display for AlreadySoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Role {} has already sold an item in this window", self.role)
    }
}

impl std::error::Error for AlreadySoldError {}

/// Tracks which roles have completed a sale. Starts empty and grows
/// monotonically; it never resets on its own. Hosts that want a daily
/// window call `reset` when the window rolls over.
///
/// When shared across request handlers the ledger is the single
/// serialization point for the one-sale-per-role invariant; hold it
/// behind one lock.
#[derive(Debug, Default)]
pub struct SaleLedger {
    records: Vec<SaleRecord>,
}

impl SaleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure read: has this role not yet sold in the current window?
    pub fn can_sell(&self, role: &Role) -> bool {
        !self.records.iter().any(|r| &r.role == role)
    }

    /// Transition the role from NotSold to Sold. The only mutation in the
    /// core; a role already in Sold state is rejected and nothing changes.
    pub fn record_sale(&mut self, role: &Role) -> Result<SaleRecord, AlreadySoldError> {
        if !self.can_sell(role) {
            return Err(AlreadySoldError { role: role.clone() });
        }

        let record = SaleRecord {
            role: role.clone(),
            timestamp: Utc::now(),
        };
        self.records.push(record.clone());
        Ok(record)
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Window rollover hook: clears all records so every role may sell
    /// again. Not called anywhere by default.
    pub fn reset(&mut self) {
        self.records.clear();
    }
}
