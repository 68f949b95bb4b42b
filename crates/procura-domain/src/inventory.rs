//! Inventory items, stock movements and stock-level classification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Item master record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    /// Stock level below which the item needs reordering.
    pub reorder_threshold: f64,
}

impl Item {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, reorder_threshold: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            sku: sku.into(),
            name: name.into(),
            reorder_threshold,
        }
    }
}

impl Identifiable for Item {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Item {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockMovement {
    In,
    Out,
}

impl fmt::Display for StockMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockMovement::In => "Stock In",
            StockMovement::Out => "Stock Out",
        };
        f.write_str(label)
    }
}

/// A completed movement of stock into or out of the warehouse.
///
/// Receipts against an invoice carry `invoice_id`/`invoice_line_id`; issues for an
/// item-route sub-request carry `sub_request_id` and usually `stock_out_request_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockTransaction {
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement: StockMovement,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost_eusd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_line_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_request_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_out_request_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl StockTransaction {
    pub fn new(item_id: Uuid, movement: StockMovement, quantity: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            movement,
            quantity,
            unit_cost_eusd: None,
            invoice_id: None,
            invoice_line_id: None,
            sub_request_id: None,
            stock_out_request_id: None,
            occurred_at: Utc::now(),
        }
    }

    /// Stock-in receipt booked against an invoice line.
    pub fn receipt(
        item_id: Uuid,
        invoice_id: Uuid,
        invoice_line_id: Uuid,
        quantity: f64,
        unit_cost_eusd: f64,
    ) -> Self {
        Self {
            unit_cost_eusd: Some(unit_cost_eusd),
            invoice_id: Some(invoice_id),
            invoice_line_id: Some(invoice_line_id),
            ..Self::new(item_id, StockMovement::In, quantity)
        }
    }

    /// Stock-out issued for an item-route sub-request.
    pub fn issue(item_id: Uuid, sub_request_id: Uuid, quantity: f64) -> Self {
        Self {
            sub_request_id: Some(sub_request_id),
            ..Self::new(item_id, StockMovement::Out, quantity)
        }
    }

    /// Quantity with the sign of the movement.
    pub fn signed_quantity(&self) -> f64 {
        match self.movement {
            StockMovement::In => self.quantity,
            StockMovement::Out => -self.quantity,
        }
    }
}

impl Identifiable for StockTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for StockTransaction {
    fn display_label(&self) -> String {
        format!("{} {}", self.movement, self.quantity)
    }
}

/// Stock-level classification for inventory alerts, most severe first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StockSeverity {
    OutOfStock,
    Critical,
    Warning,
    Normal,
}

impl StockSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            StockSeverity::OutOfStock => "Out of Stock",
            StockSeverity::Critical => "Critical",
            StockSeverity::Warning => "Low Stock",
            StockSeverity::Normal => "Normal",
        }
    }

    /// Presentation colour token understood by the dashboard theme.
    pub const fn color_token(self) -> &'static str {
        match self {
            StockSeverity::OutOfStock => "red",
            StockSeverity::Critical => "orange",
            StockSeverity::Warning => "amber",
            StockSeverity::Normal => "emerald",
        }
    }

    pub const fn needs_attention(self) -> bool {
        !matches!(self, StockSeverity::Normal)
    }
}

impl fmt::Display for StockSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cut-off ratios used to split low stock into critical and warning tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeverityThresholds {
    /// Fraction of the reorder threshold below which stock is critical.
    pub critical_ratio: f64,
}

impl SeverityThresholds {
    pub const DEFAULT_CRITICAL_RATIO: f64 = 0.5;

    pub fn new(critical_ratio: f64) -> Self {
        Self { critical_ratio }
    }
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CRITICAL_RATIO)
    }
}

/// An item whose stock level needs attention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAlert {
    pub item_id: Uuid,
    pub sku: String,
    pub name: String,
    pub current_stock: f64,
    pub reorder_threshold: f64,
    pub severity: StockSeverity,
}

impl Displayable for StockAlert {
    fn display_label(&self) -> String {
        format!(
            "{} {}: {} / {} ({})",
            self.sku, self.name, self.current_stock, self.reorder_threshold, self.severity
        )
    }
}
