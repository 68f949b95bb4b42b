//! Fulfilment progress of purchase-order lines.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::purchasing::{PurchaseOrderLine, PurchaseOrderStatus};

/// Ordered, invoiced and received quantities for one purchase-order line.
///
/// Quantities are non-negative. Nothing here caps invoiced or received above
/// the ordered quantity; over-invoicing is decided upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LineItemProgress {
    pub ordered_qty: f64,
    pub invoiced_qty: f64,
    pub received_qty: f64,
}

impl LineItemProgress {
    pub fn new(ordered_qty: f64, invoiced_qty: f64, received_qty: f64) -> Self {
        Self {
            ordered_qty,
            invoiced_qty,
            received_qty,
        }
    }

    pub fn is_fully_invoiced(&self) -> bool {
        self.invoiced_qty >= self.ordered_qty
    }

    pub fn is_fully_received(&self) -> bool {
        self.received_qty >= self.ordered_qty
    }

    pub fn is_over_fulfilled(&self) -> bool {
        self.invoiced_qty > self.ordered_qty || self.received_qty > self.ordered_qty
    }
}

impl From<&PurchaseOrderLine> for LineItemProgress {
    fn from(line: &PurchaseOrderLine) -> Self {
        Self::new(line.ordered_qty, line.invoiced_qty, line.received_qty)
    }
}

impl std::ops::Add for LineItemProgress {
    type Output = LineItemProgress;

    fn add(self, rhs: LineItemProgress) -> Self::Output {
        LineItemProgress {
            ordered_qty: self.ordered_qty + rhs.ordered_qty,
            invoiced_qty: self.invoiced_qty + rhs.invoiced_qty,
            received_qty: self.received_qty + rhs.received_qty,
        }
    }
}

impl std::iter::Sum for LineItemProgress {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(LineItemProgress::default(), |acc, item| acc + item)
    }
}

/// Completion percentages, each in `0..=100`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProgressPercent {
    pub invoiced_percent: u8,
    pub received_percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineProgress {
    pub line_id: Uuid,
    pub quantities: LineItemProgress,
    pub percent: ProgressPercent,
}

/// Per-line and whole-order progress for one purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderProgress {
    pub purchase_order_id: Uuid,
    pub lines: Vec<LineProgress>,
    pub totals: LineItemProgress,
    pub percent: ProgressPercent,
    pub status: PurchaseOrderStatus,
}
