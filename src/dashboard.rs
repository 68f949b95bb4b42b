//! Applies installation settings to a request snapshot and assembles everything
//! a request detail view renders: lineage tree, balances and order progress.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use procura_config::Config;
use procura_core::{BalanceService, FlowBuild, FlowTreeBuilder, InventoryService, ProgressService};
use procura_domain::{
    BalanceSnapshot, DroppedRow, FlowEntity, FlowNode, FlowRows, Item, OrderProgress, Request,
    StockAlert, StockTransaction,
};

use crate::utils::format::format_number;
use crate::ProcuraError;

/// A request and every row related to it, as fetched for one view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestSnapshot {
    pub request: Request,
    #[serde(default)]
    pub rows: FlowRows,
}

impl RequestSnapshot {
    pub fn new(request: Request, rows: FlowRows) -> Self {
        Self { request, rows }
    }

    /// Parses a snapshot from the JSON shape returned by the backing store.
    pub fn from_json(data: &str) -> Result<Self, ProcuraError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubRequestBalance {
    pub sub_request_id: Uuid,
    pub code: String,
    pub balance: BalanceSnapshot,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PurchaseOrderOverview {
    pub purchase_order_id: Uuid,
    pub po_number: String,
    pub total_eusd: f64,
    pub progress: OrderProgress,
    /// Lines invoiced or received beyond what was ordered.
    pub over_fulfilled_lines: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestOverview {
    pub tree: FlowNode,
    pub dropped: Vec<DroppedRow>,
    pub balances: Vec<SubRequestBalance>,
    pub purchase_orders: Vec<PurchaseOrderOverview>,
}

impl RequestOverview {
    pub fn balance_of(&self, sub_request_id: Uuid) -> Option<&BalanceSnapshot> {
        self.balances
            .iter()
            .find(|entry| entry.sub_request_id == sub_request_id)
            .map(|entry| &entry.balance)
    }

    pub fn overdrawn(&self) -> impl Iterator<Item = &SubRequestBalance> {
        self.balances
            .iter()
            .filter(|entry| entry.balance.is_overdrawn())
    }
}

/// Entry point used by dashboard views.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    config: Config,
}

impl Dashboard {
    pub fn new(config: Config) -> Result<Self, ProcuraError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the request detail view model.
    ///
    /// With `flow.strict_references` enabled a dangling or misrouted row fails the
    /// whole overview instead of being left out.
    pub fn request_overview(
        &self,
        snapshot: &RequestSnapshot,
    ) -> Result<RequestOverview, ProcuraError> {
        let FlowBuild { tree, dropped } = if self.config.flow.strict_references {
            FlowBuild {
                tree: FlowTreeBuilder::build_strict(&snapshot.request, &snapshot.rows)?,
                dropped: Vec::new(),
            }
        } else {
            FlowTreeBuilder::build_with_report(&snapshot.request, &snapshot.rows)
        };

        let mut balances = Vec::new();
        let mut purchase_orders = Vec::new();
        for node in tree.iter() {
            match &node.entity {
                FlowEntity::SubRequest(sub) => {
                    let Some(balance) = BalanceService::sub_request_balance(sub, &snapshot.rows)?
                    else {
                        continue;
                    };
                    if balance.is_overdrawn() {
                        warn!(
                            sub_request = %sub.code,
                            balance = balance.balance_in_hand,
                            "balance in hand is negative"
                        );
                    }
                    balances.push(SubRequestBalance {
                        sub_request_id: sub.id,
                        code: sub.code.clone(),
                        balance,
                    });
                }
                FlowEntity::PurchaseOrder(order) => {
                    purchase_orders.push(PurchaseOrderOverview {
                        purchase_order_id: order.id,
                        po_number: order.po_number.clone(),
                        total_eusd: BalanceService::purchase_order_total_eusd(order)?,
                        progress: ProgressService::order_progress(order),
                        over_fulfilled_lines: ProgressService::over_fulfilled_lines(order),
                    });
                }
                _ => {}
            }
        }

        info!(
            request = %snapshot.request.code,
            nodes = tree.node_count(),
            dropped = dropped.len(),
            "built request overview"
        );
        Ok(RequestOverview {
            tree,
            dropped,
            balances,
            purchase_orders,
        })
    }

    /// Low-stock alerts using the configured critical ratio.
    pub fn stock_alerts(
        &self,
        items: &[Item],
        transactions: &[StockTransaction],
    ) -> Vec<StockAlert> {
        InventoryService::stock_alerts(items, transactions, self.config.severity_thresholds())
    }

    /// Formats an EUSD amount with the configured precision, locale separators and
    /// currency label.
    pub fn format_amount(&self, amount: f64) -> String {
        let number = format_number(
            amount,
            self.config.amount_precision,
            self.config.number_style(),
        );
        format!("{} {}", number, self.config.base_currency)
    }
}
