//! Balance-in-hand aggregation for PO and expense sub-requests.

use tracing::debug;

use procura_domain::{
    BalanceSnapshot, FinancialRoute, FinancialTransaction, FinancialTransactionKind, FlowRows,
    LedgerEntry, LedgerEntryKind, PurchaseOrder, SubRequest,
};

use crate::{currency, CoreResult};

/// Stateless balance utilities that operate over ledger snapshots.
pub struct BalanceService;

impl BalanceService {
    /// Money in minus PO commitments (PO route) or minus money out (expense route).
    ///
    /// An empty ledger yields `0`. Negative balances are returned as-is.
    pub fn compute_balance(entries: &[LedgerEntry], route: FinancialRoute) -> f64 {
        Self::snapshot(entries, route).balance_in_hand
    }

    /// Totals every entry kind and derives the balance for `route`.
    pub fn snapshot(entries: &[LedgerEntry], route: FinancialRoute) -> BalanceSnapshot {
        let mut snapshot = BalanceSnapshot::empty(route);
        for entry in entries {
            match entry.kind {
                LedgerEntryKind::MoneyIn => snapshot.total_money_in += entry.amount_eusd,
                LedgerEntryKind::MoneyOut => snapshot.total_money_out += entry.amount_eusd,
                LedgerEntryKind::PoCommitted => snapshot.total_po_committed += entry.amount_eusd,
            }
        }
        let outflow = match route.outflow_kind() {
            LedgerEntryKind::PoCommitted => snapshot.total_po_committed,
            LedgerEntryKind::MoneyOut => snapshot.total_money_out,
            LedgerEntryKind::MoneyIn => 0.0,
        };
        snapshot.balance_in_hand = snapshot.total_money_in - outflow;
        snapshot
    }

    /// Turns recorded money movements into ledger entries. Voided rows are skipped.
    pub fn entries_from_financial_transactions(
        transactions: &[FinancialTransaction],
    ) -> CoreResult<Vec<LedgerEntry>> {
        transactions
            .iter()
            .filter(|txn| !txn.is_voided)
            .map(|txn| {
                let kind = match txn.kind {
                    FinancialTransactionKind::MoneyIn => LedgerEntryKind::MoneyIn,
                    FinancialTransactionKind::MoneyOut => LedgerEntryKind::MoneyOut,
                };
                Ok(LedgerEntry {
                    id: txn.id,
                    kind,
                    amount_eusd: currency::to_eusd(txn.amount, &txn.currency, txn.exchange_rate)?,
                    recorded_at: txn.recorded_at,
                })
            })
            .collect()
    }

    /// One commitment per purchase order that is still live. Cancelled orders release their money.
    pub fn entries_from_purchase_orders(orders: &[PurchaseOrder]) -> CoreResult<Vec<LedgerEntry>> {
        orders
            .iter()
            .filter(|order| !order.is_cancelled())
            .map(|order| {
                Ok(LedgerEntry {
                    id: order.id,
                    kind: LedgerEntryKind::PoCommitted,
                    amount_eusd: Self::purchase_order_total_eusd(order)?,
                    recorded_at: order.created_at,
                })
            })
            .collect()
    }

    pub fn purchase_order_total_eusd(order: &PurchaseOrder) -> CoreResult<f64> {
        currency::to_eusd(order.total_amount(), &order.currency, order.exchange_rate)
    }

    /// Balance of one sub-request from the rows of its request snapshot.
    ///
    /// Returns `None` for item-route sub-requests, which carry no money.
    pub fn sub_request_balance(
        sub_request: &SubRequest,
        rows: &FlowRows,
    ) -> CoreResult<Option<BalanceSnapshot>> {
        let Some(route) = sub_request.route_type.financial_route() else {
            return Ok(None);
        };
        let transactions: Vec<FinancialTransaction> = rows
            .financial_transactions
            .iter()
            .filter(|txn| txn.sub_request_id == sub_request.id)
            .cloned()
            .collect();
        let mut entries = Self::entries_from_financial_transactions(&transactions)?;
        if route == FinancialRoute::Po {
            let orders: Vec<PurchaseOrder> = rows
                .purchase_orders
                .iter()
                .filter(|order| order.sub_request_id == sub_request.id)
                .cloned()
                .collect();
            entries.extend(Self::entries_from_purchase_orders(&orders)?);
        }
        let snapshot = Self::snapshot(&entries, route);
        debug!(
            sub_request = %sub_request.code,
            entries = entries.len(),
            balance = snapshot.balance_in_hand,
            "computed balance in hand"
        );
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use procura_domain::{PurchaseOrderLine, PurchaseOrderStatus, RouteType};
    use uuid::Uuid;

    #[test]
    fn po_route_subtracts_commitments_only() {
        let entries = vec![
            LedgerEntry::money_in(1_000.0),
            LedgerEntry::po_committed(300.0),
            LedgerEntry::po_committed(200.0),
            LedgerEntry::money_out(50.0),
        ];
        assert_eq!(
            BalanceService::compute_balance(&entries, FinancialRoute::Po),
            500.0
        );
        assert_eq!(
            BalanceService::compute_balance(&entries, FinancialRoute::Expense),
            950.0
        );
    }

    #[test]
    fn snapshot_reports_overdraw() {
        let entries = vec![LedgerEntry::money_in(100.0), LedgerEntry::money_out(250.0)];
        let snapshot = BalanceService::snapshot(&entries, FinancialRoute::Expense);
        assert_eq!(snapshot.total_money_in, 100.0);
        assert_eq!(snapshot.total_money_out, 250.0);
        assert_eq!(snapshot.balance_in_hand, -150.0);
        assert!(snapshot.is_overdrawn());
    }

    #[test]
    fn voided_transactions_do_not_reach_the_ledger() {
        let sub = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let kept = FinancialTransaction::new(
            sub,
            FinancialTransactionKind::MoneyIn,
            300_000.0,
            "MMK",
            2_000.0,
            date,
        );
        let mut voided = kept.clone();
        voided.id = Uuid::new_v4();
        voided.is_voided = true;

        let entries =
            BalanceService::entries_from_financial_transactions(&[kept.clone(), voided]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, kept.id);
        assert_eq!(entries[0].amount_eusd, 150.0);
    }

    #[test]
    fn cancelled_orders_release_commitment() {
        let sub = Uuid::new_v4();
        let live = PurchaseOrder::new(sub, "PO-1", "USD", 1.0).with_line(PurchaseOrderLine::new(
            Uuid::new_v4(),
            "Chairs",
            4.0,
            25.0,
        ));
        let mut cancelled = live.clone();
        cancelled.id = Uuid::new_v4();
        cancelled.status = PurchaseOrderStatus::Cancelled;

        let entries = BalanceService::entries_from_purchase_orders(&[live, cancelled]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, LedgerEntryKind::PoCommitted);
        assert_eq!(entries[0].amount_eusd, 100.0);
    }

    #[test]
    fn item_route_has_no_balance() {
        let sub = SubRequest::new(Uuid::new_v4(), "QMHQ-9", "Toner", RouteType::Item);
        let balance = BalanceService::sub_request_balance(&sub, &FlowRows::default()).unwrap();
        assert!(balance.is_none());
    }
}
