//! Stock levels, weighted average cost and low-stock alerts.

use std::collections::HashMap;

use uuid::Uuid;

use procura_domain::{
    Item, SeverityThresholds, StockAlert, StockMovement, StockTransaction,
};

use crate::{currency, ProgressService};

/// Decimal places kept on weighted average costs.
pub const WAC_DECIMALS: u32 = 2;

pub struct InventoryService;

impl InventoryService {
    /// Stock in minus stock out for one item.
    pub fn stock_level(transactions: &[StockTransaction], item_id: Uuid) -> f64 {
        transactions
            .iter()
            .filter(|txn| txn.item_id == item_id)
            .map(StockTransaction::signed_quantity)
            .sum()
    }

    pub fn stock_levels(transactions: &[StockTransaction]) -> HashMap<Uuid, f64> {
        let mut levels = HashMap::new();
        for txn in transactions {
            *levels.entry(txn.item_id).or_insert(0.0) += txn.signed_quantity();
        }
        levels
    }

    /// Blends a receipt into the running unit cost.
    ///
    /// Without a received quantity the current cost is kept; when there was no stock
    /// on hand the receipt's cost becomes the new average.
    pub fn weighted_average_cost(
        current_qty: f64,
        current_wac: f64,
        received_qty: f64,
        unit_cost: f64,
    ) -> f64 {
        if received_qty <= 0.0 {
            return current_wac;
        }
        if current_qty <= 0.0 {
            return currency::round_half_up(unit_cost, WAC_DECIMALS);
        }
        let blended = (current_qty * current_wac + received_qty * unit_cost)
            / (current_qty + received_qty);
        currency::round_half_up(blended, WAC_DECIMALS)
    }

    /// Replays an item's movements in the given order and returns the resulting average cost.
    pub fn replay_wac(transactions: &[StockTransaction], item_id: Uuid) -> f64 {
        let mut quantity = 0.0;
        let mut wac = 0.0;
        for txn in transactions.iter().filter(|txn| txn.item_id == item_id) {
            match (txn.movement, txn.unit_cost_eusd) {
                (StockMovement::In, Some(unit_cost)) => {
                    wac = Self::weighted_average_cost(quantity, wac, txn.quantity, unit_cost);
                    quantity += txn.quantity;
                }
                (StockMovement::In, None) => quantity += txn.quantity,
                (StockMovement::Out, _) => quantity -= txn.quantity,
            }
        }
        wac
    }

    /// Items needing attention, most severe first, then by SKU.
    pub fn stock_alerts(
        items: &[Item],
        transactions: &[StockTransaction],
        thresholds: SeverityThresholds,
    ) -> Vec<StockAlert> {
        let levels = Self::stock_levels(transactions);
        let mut alerts: Vec<StockAlert> = items
            .iter()
            .filter_map(|item| {
                let current_stock = levels.get(&item.id).copied().unwrap_or_default();
                let severity =
                    ProgressService::classify_stock(current_stock, item.reorder_threshold, thresholds);
                severity.needs_attention().then(|| StockAlert {
                    item_id: item.id,
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    current_stock,
                    reorder_threshold: item.reorder_threshold,
                    severity,
                })
            })
            .collect();
        alerts.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.sku.cmp(&b.sku)));
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_domain::StockSeverity;

    #[test]
    fn wac_blends_receipts() {
        assert_eq!(
            InventoryService::weighted_average_cost(10.0, 5.0, 10.0, 7.0),
            6.0
        );
        assert_eq!(
            InventoryService::weighted_average_cost(3.0, 1.0, 0.0, 9.0),
            1.0
        );
        assert_eq!(
            InventoryService::weighted_average_cost(0.0, 4.0, 2.0, 9.5),
            9.5
        );
        assert_eq!(
            InventoryService::weighted_average_cost(2.0, 1.0, 1.0, 2.0),
            1.33
        );
    }

    #[test]
    fn replay_applies_issues_between_receipts() {
        let item = Uuid::new_v4();
        let mut first = StockTransaction::new(item, StockMovement::In, 10.0);
        first.unit_cost_eusd = Some(4.0);
        let issue = StockTransaction::new(item, StockMovement::Out, 10.0);
        let mut second = StockTransaction::new(item, StockMovement::In, 5.0);
        second.unit_cost_eusd = Some(8.0);
        let transactions = vec![first, issue, second];

        assert_eq!(InventoryService::stock_level(&transactions, item), 5.0);
        assert_eq!(InventoryService::replay_wac(&transactions, item), 8.0);
    }

    #[test]
    fn alerts_sorted_by_severity_then_sku() {
        let empty = Item::new("B-200", "Bolts", 10.0);
        let low = Item::new("A-100", "Anchors", 10.0);
        let fine = Item::new("C-300", "Clamps", 10.0);
        let transactions = vec![
            StockTransaction::new(low.id, StockMovement::In, 7.0),
            StockTransaction::new(fine.id, StockMovement::In, 12.0),
        ];
        let alerts = InventoryService::stock_alerts(
            &[fine, low, empty],
            &transactions,
            SeverityThresholds::default(),
        );
        let summary: Vec<_> = alerts
            .iter()
            .map(|alert| (alert.sku.as_str(), alert.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("B-200", StockSeverity::OutOfStock),
                ("A-100", StockSeverity::Warning),
            ]
        );
    }
}
