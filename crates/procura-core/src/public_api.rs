//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Rendering code and other frontends call these four entry points without
//! depending on the entire service surface area.

use procura_domain::{
    FinancialRoute, FlowNode, FlowRows, LedgerEntry, ProgressPercent, Request, StockSeverity,
};

use crate::{BalanceService, FlowTreeBuilder, ProgressService};

/// Balance in hand of a PO or expense ledger.
pub fn api_compute_balance(entries: &[LedgerEntry], route: FinancialRoute) -> f64 {
    BalanceService::compute_balance(entries, route)
}

/// Invoiced and received percentages of one purchase-order line.
pub fn api_compute_line_progress(ordered: f64, invoiced: f64, received: f64) -> ProgressPercent {
    ProgressService::compute_line_progress(ordered, invoiced, received)
}

/// Stock severity with the default critical ratio.
pub fn api_compute_stock_severity(current_stock: f64, threshold: f64) -> StockSeverity {
    ProgressService::compute_stock_severity(current_stock, threshold)
}

/// Lineage tree of `root`; rows with dangling parents are left out.
pub fn api_build_flow_tree(root: &Request, rows: &FlowRows) -> FlowNode {
    FlowTreeBuilder::build(root, rows)
}
