//! Invoiced/received progress of purchase orders and stock severity classification.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use procura_domain::{
    Invoice, LineItemProgress, LineProgress, OrderProgress, ProgressPercent, PurchaseOrder,
    PurchaseOrderStatus, SeverityThresholds, StockMovement, StockSeverity, StockTransaction,
};

/// Stateless progress utilities over purchase-order snapshots.
pub struct ProgressService;

impl ProgressService {
    /// `round(quantity / ordered * 100)` clamped to `0..=100`; `0` when nothing was ordered.
    pub fn percent_of(quantity: f64, ordered: f64) -> u8 {
        if ordered > 0.0 {
            (quantity / ordered * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        }
    }

    /// Over-fulfilment shows as 100; it is reported separately by [`Self::over_fulfilled_lines`].
    pub fn compute_line_progress(ordered: f64, invoiced: f64, received: f64) -> ProgressPercent {
        ProgressPercent {
            invoiced_percent: Self::percent_of(invoiced, ordered),
            received_percent: Self::percent_of(received, ordered),
        }
    }

    pub fn line_progress(progress: &LineItemProgress) -> ProgressPercent {
        Self::compute_line_progress(
            progress.ordered_qty,
            progress.invoiced_qty,
            progress.received_qty,
        )
    }

    /// Classifies stock with the default critical ratio of one half.
    pub fn compute_stock_severity(current_stock: f64, threshold: f64) -> StockSeverity {
        Self::classify_stock(current_stock, threshold, SeverityThresholds::default())
    }

    /// A level equal to the threshold is `Normal`.
    pub fn classify_stock(
        current_stock: f64,
        threshold: f64,
        thresholds: SeverityThresholds,
    ) -> StockSeverity {
        if current_stock <= 0.0 {
            StockSeverity::OutOfStock
        } else if current_stock < threshold * thresholds.critical_ratio {
            StockSeverity::Critical
        } else if current_stock < threshold {
            StockSeverity::Warning
        } else {
            StockSeverity::Normal
        }
    }

    /// Progress of every line plus the order as a whole, using the stored line counters.
    pub fn order_progress(order: &PurchaseOrder) -> OrderProgress {
        let lines: Vec<LineProgress> = order
            .lines
            .iter()
            .map(|line| {
                let quantities = LineItemProgress::from(line);
                LineProgress {
                    line_id: line.id,
                    quantities,
                    percent: Self::line_progress(&quantities),
                }
            })
            .collect();
        let totals: LineItemProgress = lines.iter().map(|line| line.quantities).sum();
        OrderProgress {
            purchase_order_id: order.id,
            percent: Self::line_progress(&totals),
            totals,
            lines,
            status: Self::derive_order_status(order),
        }
    }

    /// Derives the order state from its line counters. `Cancelled` is sticky.
    pub fn derive_order_status(order: &PurchaseOrder) -> PurchaseOrderStatus {
        if order.is_cancelled() {
            return PurchaseOrderStatus::Cancelled;
        }
        let progress: Vec<LineItemProgress> =
            order.lines.iter().map(LineItemProgress::from).collect();
        let has_lines = !progress.is_empty();
        let all_invoiced = has_lines && progress.iter().all(LineItemProgress::is_fully_invoiced);
        let all_received = has_lines && progress.iter().all(LineItemProgress::is_fully_received);
        let any_invoiced = progress.iter().any(|line| line.invoiced_qty > 0.0);
        let any_received = progress.iter().any(|line| line.received_qty > 0.0);

        let status = if all_invoiced && all_received {
            PurchaseOrderStatus::Closed
        } else if any_received {
            PurchaseOrderStatus::PartiallyReceived
        } else if all_invoiced {
            PurchaseOrderStatus::AwaitingDelivery
        } else if any_invoiced {
            PurchaseOrderStatus::PartiallyInvoiced
        } else {
            PurchaseOrderStatus::NotStarted
        };
        debug!(po = %order.po_number, %status, "derived purchase order status");
        status
    }

    /// Recounts invoiced and received quantities per order line from invoice and receipt rows.
    ///
    /// Voided invoices, and receipts booked against them, are ignored. The result follows
    /// the order's line order.
    pub fn tally_line_quantities(
        order: &PurchaseOrder,
        invoices: &[Invoice],
        receipts: &[StockTransaction],
    ) -> Vec<LineItemProgress> {
        let mut invoiced: HashMap<Uuid, f64> = HashMap::new();
        let mut po_line_of_invoice_line: HashMap<Uuid, Uuid> = HashMap::new();
        for invoice in invoices
            .iter()
            .filter(|invoice| invoice.purchase_order_id == order.id && !invoice.is_voided())
        {
            for line in &invoice.lines {
                *invoiced.entry(line.po_line_id).or_default() += line.quantity;
                po_line_of_invoice_line.insert(line.id, line.po_line_id);
            }
        }

        let mut received: HashMap<Uuid, f64> = HashMap::new();
        for receipt in receipts
            .iter()
            .filter(|txn| txn.movement == StockMovement::In)
        {
            let po_line = receipt
                .invoice_line_id
                .and_then(|id| po_line_of_invoice_line.get(&id));
            if let Some(po_line) = po_line {
                *received.entry(*po_line).or_default() += receipt.quantity;
            }
        }

        order
            .lines
            .iter()
            .map(|line| {
                LineItemProgress::new(
                    line.ordered_qty,
                    invoiced.get(&line.id).copied().unwrap_or_default(),
                    received.get(&line.id).copied().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Writes recounted quantities back onto the order lines and refreshes the status.
    pub fn reconcile_order(
        order: &mut PurchaseOrder,
        invoices: &[Invoice],
        receipts: &[StockTransaction],
    ) -> PurchaseOrderStatus {
        let tallies = Self::tally_line_quantities(order, invoices, receipts);
        for (line, tally) in order.lines.iter_mut().zip(tallies) {
            line.invoiced_qty = tally.invoiced_qty;
            line.received_qty = tally.received_qty;
        }
        order.status = Self::derive_order_status(order);
        order.status
    }

    /// Lines invoiced or received beyond the ordered quantity.
    pub fn over_fulfilled_lines(order: &PurchaseOrder) -> Vec<Uuid> {
        order
            .lines
            .iter()
            .filter(|line| LineItemProgress::from(*line).is_over_fulfilled())
            .map(|line| line.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use procura_domain::{InvoiceLine, InvoiceStatus, PurchaseOrderLine};

    fn order_with_lines(lines: &[(f64, f64, f64)]) -> PurchaseOrder {
        let mut order = PurchaseOrder::new(Uuid::new_v4(), "PO-2025-0001", "USD", 1.0);
        for (ordered, invoiced, received) in lines {
            let mut line = PurchaseOrderLine::new(Uuid::new_v4(), "Line", *ordered, 10.0);
            line.invoiced_qty = *invoiced;
            line.received_qty = *received;
            order.lines.push(line);
        }
        order
    }

    #[test]
    fn percent_clamps_and_guards_zero() {
        assert_eq!(ProgressService::percent_of(150.0, 100.0), 100);
        assert_eq!(ProgressService::percent_of(1.0, 3.0), 33);
        assert_eq!(ProgressService::percent_of(2.0, 3.0), 67);
        assert_eq!(ProgressService::percent_of(5.0, 0.0), 0);
        assert_eq!(ProgressService::percent_of(-5.0, 10.0), 0);
    }

    #[test]
    fn severity_tiers() {
        assert_eq!(
            ProgressService::compute_stock_severity(0.0, 10.0),
            StockSeverity::OutOfStock
        );
        assert_eq!(
            ProgressService::compute_stock_severity(4.0, 10.0),
            StockSeverity::Critical
        );
        assert_eq!(
            ProgressService::compute_stock_severity(5.0, 10.0),
            StockSeverity::Warning
        );
        assert_eq!(
            ProgressService::compute_stock_severity(10.0, 10.0),
            StockSeverity::Normal
        );
        assert_eq!(
            ProgressService::classify_stock(5.0, 10.0, SeverityThresholds::new(0.6)),
            StockSeverity::Critical
        );
    }

    #[test]
    fn status_follows_line_counters() {
        let cases = [
            (vec![(10.0, 0.0, 0.0)], PurchaseOrderStatus::NotStarted),
            (
                vec![(10.0, 4.0, 0.0), (5.0, 0.0, 0.0)],
                PurchaseOrderStatus::PartiallyInvoiced,
            ),
            (
                vec![(10.0, 10.0, 0.0), (5.0, 5.0, 0.0)],
                PurchaseOrderStatus::AwaitingDelivery,
            ),
            (
                vec![(10.0, 10.0, 3.0), (5.0, 5.0, 0.0)],
                PurchaseOrderStatus::PartiallyReceived,
            ),
            (
                vec![(10.0, 10.0, 10.0), (5.0, 6.0, 5.0)],
                PurchaseOrderStatus::Closed,
            ),
        ];
        for (lines, expected) in cases {
            let order = order_with_lines(&lines);
            assert_eq!(ProgressService::derive_order_status(&order), expected);
        }

        let mut cancelled = order_with_lines(&[(10.0, 10.0, 10.0)]);
        cancelled.status = PurchaseOrderStatus::Cancelled;
        assert_eq!(
            ProgressService::derive_order_status(&cancelled),
            PurchaseOrderStatus::Cancelled
        );
        assert_eq!(
            ProgressService::derive_order_status(&order_with_lines(&[])),
            PurchaseOrderStatus::NotStarted
        );
    }

    #[test]
    fn order_progress_aggregates_lines() {
        let order = order_with_lines(&[(10.0, 10.0, 5.0), (30.0, 10.0, 0.0)]);
        let progress = ProgressService::order_progress(&order);
        assert_eq!(progress.lines.len(), 2);
        assert_eq!(progress.lines[0].percent.invoiced_percent, 100);
        assert_eq!(progress.lines[0].percent.received_percent, 50);
        assert_eq!(progress.totals.ordered_qty, 40.0);
        assert_eq!(progress.percent.invoiced_percent, 50);
        assert_eq!(progress.percent.received_percent, 13);
        assert_eq!(progress.status, PurchaseOrderStatus::PartiallyReceived);
    }

    #[test]
    fn tally_ignores_voided_invoices() {
        let mut order = order_with_lines(&[(10.0, 0.0, 0.0), (4.0, 0.0, 0.0)]);
        let first = order.lines[0].id;
        let second = order.lines[1].id;
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        let billed_line = InvoiceLine::new(first, 6.0, 10.0);
        let billed = Invoice::new(order.id, "INV-1", "USD", 1.0, date)
            .with_line(billed_line.clone())
            .with_line(InvoiceLine::new(second, 4.0, 10.0));
        let mut voided = Invoice::new(order.id, "INV-2", "USD", 1.0, date)
            .with_line(InvoiceLine::new(first, 4.0, 10.0));
        voided.status = InvoiceStatus::Voided;
        let other_order = Invoice::new(Uuid::new_v4(), "INV-3", "USD", 1.0, date)
            .with_line(InvoiceLine::new(first, 9.0, 10.0));

        let receipt = StockTransaction::receipt(
            order.lines[0].item_id,
            billed.id,
            billed_line.id,
            5.0,
            10.0,
        );
        let invoices = vec![billed, voided, other_order];
        let tallies = ProgressService::tally_line_quantities(&order, &invoices, &[receipt.clone()]);
        assert_eq!(tallies[0], LineItemProgress::new(10.0, 6.0, 5.0));
        assert_eq!(tallies[1], LineItemProgress::new(4.0, 4.0, 0.0));

        let status = ProgressService::reconcile_order(&mut order, &invoices, &[receipt]);
        assert_eq!(status, PurchaseOrderStatus::PartiallyReceived);
        assert_eq!(order.lines[0].invoiced_qty, 6.0);
        assert_eq!(order.lines[1].invoiced_qty, 4.0);
    }

    #[test]
    fn over_fulfilment_is_reported_not_clamped() {
        let order = order_with_lines(&[(100.0, 150.0, 0.0), (10.0, 10.0, 10.0)]);
        let flagged = ProgressService::over_fulfilled_lines(&order);
        assert_eq!(flagged, vec![order.lines[0].id]);
        let progress = ProgressService::order_progress(&order);
        assert_eq!(progress.lines[0].percent.invoiced_percent, 100);
    }
}
