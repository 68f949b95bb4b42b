//! Money ledger primitives for financial sub-requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    MoneyIn,
    MoneyOut,
    PoCommitted,
}

impl fmt::Display for LedgerEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LedgerEntryKind::MoneyIn => "Money In",
            LedgerEntryKind::MoneyOut => "Money Out",
            LedgerEntryKind::PoCommitted => "PO Committed",
        };
        f.write_str(label)
    }
}

/// A single recorded movement, already normalised to EUSD.
///
/// Entries are never edited after recording. Voiding or cancelling the source
/// row removes it from the ledger upstream instead of rewriting the amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: LedgerEntryKind,
    pub amount_eusd: f64,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(kind: LedgerEntryKind, amount_eusd: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount_eusd,
            recorded_at,
        }
    }

    pub fn money_in(amount_eusd: f64) -> Self {
        Self::new(LedgerEntryKind::MoneyIn, amount_eusd, Utc::now())
    }

    pub fn money_out(amount_eusd: f64) -> Self {
        Self::new(LedgerEntryKind::MoneyOut, amount_eusd, Utc::now())
    }

    pub fn po_committed(amount_eusd: f64) -> Self {
        Self::new(LedgerEntryKind::PoCommitted, amount_eusd, Utc::now())
    }
}

impl Identifiable for LedgerEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        format!("{} {:.2} EUSD", self.kind, self.amount_eusd)
    }
}

/// Downstream workflow of a sub-request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Item,
    Expense,
    Po,
}

impl RouteType {
    /// Returns the balance rule for routes that carry money, `None` for item routes.
    pub const fn financial_route(self) -> Option<FinancialRoute> {
        match self {
            RouteType::Item => None,
            RouteType::Expense => Some(FinancialRoute::Expense),
            RouteType::Po => Some(FinancialRoute::Po),
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RouteType::Item => "Item",
            RouteType::Expense => "Expense",
            RouteType::Po => "PO",
        };
        f.write_str(label)
    }
}

/// Routes whose balance is computed from a money ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FinancialRoute {
    Po,
    Expense,
}

impl FinancialRoute {
    /// Ledger kind subtracted from incoming money for this route.
    pub const fn outflow_kind(self) -> LedgerEntryKind {
        match self {
            FinancialRoute::Po => LedgerEntryKind::PoCommitted,
            FinancialRoute::Expense => LedgerEntryKind::MoneyOut,
        }
    }
}

impl From<FinancialRoute> for RouteType {
    fn from(value: FinancialRoute) -> Self {
        match value {
            FinancialRoute::Po => RouteType::Po,
            FinancialRoute::Expense => RouteType::Expense,
        }
    }
}

/// Derived totals for one ledger. Recomputed on every read, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BalanceSnapshot {
    pub route: FinancialRoute,
    pub total_money_in: f64,
    pub total_money_out: f64,
    pub total_po_committed: f64,
    pub balance_in_hand: f64,
}

impl BalanceSnapshot {
    pub fn empty(route: FinancialRoute) -> Self {
        Self {
            route,
            total_money_in: 0.0,
            total_money_out: 0.0,
            total_po_committed: 0.0,
            balance_in_hand: 0.0,
        }
    }

    /// Returns `true` when more money is committed or spent than received.
    pub fn is_overdrawn(&self) -> bool {
        self.balance_in_hand < 0.0
    }
}
