#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use procura::procura_core::ProgressService;
use procura::procura_domain::{
    FinancialTransaction, FinancialTransactionKind, FlowRows, Invoice, InvoiceLine, Item,
    PurchaseOrder, PurchaseOrderLine, Request, RouteType, StockOutRequest, StockTransaction,
    SubRequest,
};
use procura::RequestSnapshot;

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).expect("valid date")
}

/// Ids of the rows tests need to look up again.
pub struct Keys {
    pub po_sub: Uuid,
    pub expense_sub: Uuid,
    pub item_sub: Uuid,
    pub racking: Uuid,
    pub gloves: Uuid,
    pub rack_order: Uuid,
}

/// A fit-out request with one sub-request per route.
///
/// The rack order has 6 of 10 units invoiced and received; the expense
/// sub-request holds 500 USD in and 120 USD out; 20 pairs of gloves were issued.
pub fn snapshot() -> (RequestSnapshot, Keys) {
    let request = Request::new("QMRL-2025-0001", "Warehouse fit-out");
    let po_sub = SubRequest::new(request.id, "QMHQ-0001", "Racking", RouteType::Po);
    let expense_sub = SubRequest::new(request.id, "QMHQ-0002", "Transport", RouteType::Expense);
    let item_sub = SubRequest::new(request.id, "QMHQ-0003", "Gloves", RouteType::Item);

    let racking = Uuid::new_v4();
    let gloves = Uuid::new_v4();
    let line = PurchaseOrderLine::new(racking, "Rack unit", 10.0, 120.0);
    let line_id = line.id;
    let mut rack_order = PurchaseOrder::new(po_sub.id, "PO-0001", "USD", 1.0).with_line(line);
    let spare_order = PurchaseOrder::new(po_sub.id, "PO-0002", "USD", 1.0);

    let invoice_line = InvoiceLine::new(line_id, 6.0, 120.0);
    let invoice =
        Invoice::new(rack_order.id, "INV-0001", "USD", 1.0, date(3)).with_line(invoice_line.clone());
    let receipt = StockTransaction::receipt(racking, invoice.id, invoice_line.id, 6.0, 120.0);
    ProgressService::reconcile_order(
        &mut rack_order,
        std::slice::from_ref(&invoice),
        std::slice::from_ref(&receipt),
    );

    let money_in = FinancialTransaction::new(
        expense_sub.id,
        FinancialTransactionKind::MoneyIn,
        500.0,
        "USD",
        1.0,
        date(1),
    );
    let money_out = FinancialTransaction::new(
        expense_sub.id,
        FinancialTransactionKind::MoneyOut,
        120.0,
        "USD",
        1.0,
        date(2),
    );
    let stock_out = StockOutRequest::new(item_sub.id, gloves, 20.0);
    let issue = StockTransaction::issue(gloves, item_sub.id, 20.0);

    let keys = Keys {
        po_sub: po_sub.id,
        expense_sub: expense_sub.id,
        item_sub: item_sub.id,
        racking,
        gloves,
        rack_order: rack_order.id,
    };
    let rows = FlowRows {
        sub_requests: vec![po_sub, expense_sub, item_sub],
        purchase_orders: vec![rack_order, spare_order],
        invoices: vec![invoice],
        financial_transactions: vec![money_in, money_out],
        stock_out_requests: vec![stock_out],
        stock_transactions: vec![receipt, issue],
    };
    (RequestSnapshot::new(request, rows), keys)
}

pub fn items(keys: &Keys) -> Vec<Item> {
    let mut racking = Item::new("RCK-01", "Rack unit", 10.0);
    racking.id = keys.racking;
    let mut gloves = Item::new("GLV-01", "Work gloves", 40.0);
    gloves.id = keys.gloves;
    vec![racking, gloves]
}
