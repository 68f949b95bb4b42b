//! Purchase orders, their lines, and the invoices raised against them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Lifecycle state of a purchase order.
///
/// Apart from `Cancelled`, the state is derived from invoiced/received progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    #[default]
    NotStarted,
    PartiallyInvoiced,
    AwaitingDelivery,
    PartiallyReceived,
    Closed,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub const fn status_group(self) -> StatusGroup {
        match self {
            PurchaseOrderStatus::NotStarted => StatusGroup::ToDo,
            PurchaseOrderStatus::PartiallyInvoiced
            | PurchaseOrderStatus::AwaitingDelivery
            | PurchaseOrderStatus::PartiallyReceived => StatusGroup::InProgress,
            PurchaseOrderStatus::Closed | PurchaseOrderStatus::Cancelled => StatusGroup::Done,
        }
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PurchaseOrderStatus::NotStarted => "Not Started",
            PurchaseOrderStatus::PartiallyInvoiced => "Partially Invoiced",
            PurchaseOrderStatus::AwaitingDelivery => "Awaiting Delivery",
            PurchaseOrderStatus::PartiallyReceived => "Partially Received",
            PurchaseOrderStatus::Closed => "Closed",
            PurchaseOrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// One ordered item on a purchase order, with its running fulfilment counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrderLine {
    pub id: Uuid,
    pub item_id: Uuid,
    pub description: String,
    pub ordered_qty: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub invoiced_qty: f64,
    #[serde(default)]
    pub received_qty: f64,
}

impl PurchaseOrderLine {
    pub fn new(
        item_id: Uuid,
        description: impl Into<String>,
        ordered_qty: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            description: description.into(),
            ordered_qty,
            unit_price,
            invoiced_qty: 0.0,
            received_qty: 0.0,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.ordered_qty * self.unit_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub sub_request_id: Uuid,
    pub po_number: String,
    #[serde(default)]
    pub status: PurchaseOrderStatus,
    pub currency: String,
    pub exchange_rate: f64,
    #[serde(default)]
    pub lines: Vec<PurchaseOrderLine>,
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn new(
        sub_request_id: Uuid,
        po_number: impl Into<String>,
        currency: impl Into<String>,
        exchange_rate: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sub_request_id,
            po_number: po_number.into(),
            status: PurchaseOrderStatus::default(),
            currency: currency.into().to_uppercase(),
            exchange_rate,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_line(mut self, line: PurchaseOrderLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Order total in the order's own currency.
    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(PurchaseOrderLine::line_total).sum()
    }

    pub fn line(&self, id: Uuid) -> Option<&PurchaseOrderLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == PurchaseOrderStatus::Cancelled
    }
}

impl Identifiable for PurchaseOrder {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for PurchaseOrder {
    fn display_label(&self) -> String {
        format!(
            "{} {:.2} {} [{}]",
            self.po_number,
            self.total_amount(),
            self.currency,
            self.status
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Received,
    Voided,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Received => "Received",
            InvoiceStatus::Voided => "Voided",
        };
        f.write_str(label)
    }
}

/// Quantity of a purchase-order line billed on an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    pub id: Uuid,
    pub po_line_id: Uuid,
    pub quantity: f64,
    pub unit_price: f64,
}

impl InvoiceLine {
    pub fn new(po_line_id: Uuid, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            po_line_id,
            quantity,
            unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub invoice_number: String,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub currency: String,
    pub exchange_rate: f64,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    pub invoice_date: NaiveDate,
}

impl Invoice {
    pub fn new(
        purchase_order_id: Uuid,
        invoice_number: impl Into<String>,
        currency: impl Into<String>,
        exchange_rate: f64,
        invoice_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            purchase_order_id,
            invoice_number: invoice_number.into(),
            status: InvoiceStatus::default(),
            currency: currency.into().to_uppercase(),
            exchange_rate,
            lines: Vec::new(),
            invoice_date,
        }
    }

    pub fn with_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn total_amount(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.quantity * line.unit_price)
            .sum()
    }

    pub fn is_voided(&self) -> bool {
        self.status == InvoiceStatus::Voided
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Invoice {
    fn display_label(&self) -> String {
        format!(
            "{} {:.2} {} [{}]",
            self.invoice_number,
            self.total_amount(),
            self.currency,
            self.status
        )
    }
}
