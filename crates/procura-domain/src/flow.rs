//! Lineage tree of a request: sub-requests, orders, invoices and stock movements.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::*,
    inventory::StockTransaction,
    ledger::RouteType,
    purchasing::{Invoice, PurchaseOrder},
    request::{FinancialTransaction, Request, StockOutRequest, SubRequest},
};

/// Tag identifying which table a flow row came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FlowEntityKind {
    Request,
    SubRequest,
    PurchaseOrder,
    Invoice,
    FinancialTransaction,
    StockOutRequest,
    StockTransaction,
}

impl fmt::Display for FlowEntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlowEntityKind::Request => "request",
            FlowEntityKind::SubRequest => "sub-request",
            FlowEntityKind::PurchaseOrder => "purchase order",
            FlowEntityKind::Invoice => "invoice",
            FlowEntityKind::FinancialTransaction => "financial transaction",
            FlowEntityKind::StockOutRequest => "stock-out request",
            FlowEntityKind::StockTransaction => "stock transaction",
        };
        f.write_str(label)
    }
}

/// Record carried by a flow node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum FlowEntity {
    Request(Request),
    SubRequest(SubRequest),
    PurchaseOrder(PurchaseOrder),
    Invoice(Invoice),
    FinancialTransaction(FinancialTransaction),
    StockOutRequest(StockOutRequest),
    StockTransaction(StockTransaction),
}

impl FlowEntity {
    pub fn kind(&self) -> FlowEntityKind {
        match self {
            FlowEntity::Request(_) => FlowEntityKind::Request,
            FlowEntity::SubRequest(_) => FlowEntityKind::SubRequest,
            FlowEntity::PurchaseOrder(_) => FlowEntityKind::PurchaseOrder,
            FlowEntity::Invoice(_) => FlowEntityKind::Invoice,
            FlowEntity::FinancialTransaction(_) => FlowEntityKind::FinancialTransaction,
            FlowEntity::StockOutRequest(_) => FlowEntityKind::StockOutRequest,
            FlowEntity::StockTransaction(_) => FlowEntityKind::StockTransaction,
        }
    }

    pub fn reference(&self) -> FlowRef {
        FlowRef {
            kind: self.kind(),
            id: self.id(),
        }
    }
}

impl Identifiable for FlowEntity {
    fn id(&self) -> Uuid {
        match self {
            FlowEntity::Request(record) => record.id,
            FlowEntity::SubRequest(record) => record.id,
            FlowEntity::PurchaseOrder(record) => record.id,
            FlowEntity::Invoice(record) => record.id,
            FlowEntity::FinancialTransaction(record) => record.id,
            FlowEntity::StockOutRequest(record) => record.id,
            FlowEntity::StockTransaction(record) => record.id,
        }
    }
}

impl Displayable for FlowEntity {
    fn display_label(&self) -> String {
        match self {
            FlowEntity::Request(record) => record.display_label(),
            FlowEntity::SubRequest(record) => record.display_label(),
            FlowEntity::PurchaseOrder(record) => record.display_label(),
            FlowEntity::Invoice(record) => record.display_label(),
            FlowEntity::FinancialTransaction(record) => record.display_label(),
            FlowEntity::StockOutRequest(record) => record.display_label(),
            FlowEntity::StockTransaction(record) => record.display_label(),
        }
    }
}

/// Typed pointer to a row in the flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowRef {
    pub kind: FlowEntityKind,
    pub id: Uuid,
}

impl fmt::Display for FlowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Parent/child pair produced when a tree is flattened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowEdge {
    pub parent: FlowRef,
    pub child: FlowRef,
}

/// One node of a request's lineage tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowNode {
    pub entity: FlowEntity,
    #[serde(default)]
    pub children: Vec<FlowNode>,
}

impl FlowNode {
    pub fn leaf(entity: FlowEntity) -> Self {
        Self {
            entity,
            children: Vec::new(),
        }
    }

    pub fn with_children(entity: FlowEntity, children: Vec<FlowNode>) -> Self {
        Self { entity, children }
    }

    pub fn kind(&self) -> FlowEntityKind {
        self.entity.kind()
    }

    pub fn reference(&self) -> FlowRef {
        self.entity.reference()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first, pre-order traversal starting at this node.
    pub fn iter(&self) -> FlowIter<'_> {
        FlowIter { stack: vec![self] }
    }

    /// Number of nodes in the subtree, this node included.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn find(&self, reference: FlowRef) -> Option<&FlowNode> {
        self.iter().find(|node| node.reference() == reference)
    }

    /// Flattens the tree into parent/child pairs in traversal order.
    pub fn edges(&self) -> Vec<FlowEdge> {
        let mut edges = Vec::new();
        for node in self.iter() {
            let parent = node.reference();
            edges.extend(node.children.iter().map(|child| FlowEdge {
                parent,
                child: child.reference(),
            }));
        }
        edges
    }

    /// Indented text rendering, two spaces per level.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let _ = writeln!(
            out,
            "{:indent$}{}",
            "",
            self.entity.display_label(),
            indent = depth * 2
        );
        for child in &self.children {
            child.write_outline(out, depth + 1);
        }
    }
}

pub struct FlowIter<'a> {
    stack: Vec<&'a FlowNode>,
}

impl<'a> Iterator for FlowIter<'a> {
    type Item = &'a FlowNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Flat rows related to one request, as returned by the storage layer.
///
/// Each list keeps the order chosen by the caller's query; the tree keeps it too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowRows {
    #[serde(default)]
    pub sub_requests: Vec<SubRequest>,
    #[serde(default)]
    pub purchase_orders: Vec<PurchaseOrder>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub financial_transactions: Vec<FinancialTransaction>,
    #[serde(default)]
    pub stock_out_requests: Vec<StockOutRequest>,
    #[serde(default)]
    pub stock_transactions: Vec<StockTransaction>,
}

impl FlowRows {
    pub fn len(&self) -> usize {
        self.sub_requests.len()
            + self.purchase_orders.len()
            + self.invoices.len()
            + self.financial_transactions.len()
            + self.stock_out_requests.len()
            + self.stock_transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Why a row was left out of the tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// The foreign key does not match any row in the snapshot.
    MissingParent { parent: FlowRef },
    /// The parent exists but its route never carries this kind of child.
    RouteMismatch { parent: FlowRef, route: RouteType },
    /// The row carries no parent key at all.
    Unlinked,
    /// Another row of the same kind with the same id was placed first.
    Duplicate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DroppedRow {
    pub row: FlowRef,
    pub reason: DropReason,
}

impl fmt::Display for DroppedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            DropReason::MissingParent { parent } => {
                write!(f, "{} references missing {}", self.row, parent)
            }
            DropReason::RouteMismatch { parent, route } => {
                write!(f, "{} cannot hang off {} ({} route)", self.row, parent, route)
            }
            DropReason::Unlinked => write!(f, "{} has no parent reference", self.row),
            DropReason::Duplicate => write!(f, "{} appears more than once", self.row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> FlowNode {
        let request = Request::new("QMRL-0001", "Office fit-out");
        let sub = SubRequest::new(request.id, "QMHQ-0001", "Desks", RouteType::Po);
        let order = PurchaseOrder::new(sub.id, "PO-0001", "usd", 1.0);
        FlowNode::with_children(
            FlowEntity::Request(request),
            vec![FlowNode::with_children(
                FlowEntity::SubRequest(sub),
                vec![FlowNode::leaf(FlowEntity::PurchaseOrder(order))],
            )],
        )
    }

    #[test]
    fn iter_visits_nodes_pre_order() {
        let tree = small_tree();
        let kinds: Vec<_> = tree.iter().map(FlowNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                FlowEntityKind::Request,
                FlowEntityKind::SubRequest,
                FlowEntityKind::PurchaseOrder
            ]
        );
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn edges_link_each_child_to_its_parent() {
        let tree = small_tree();
        let edges = tree.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].parent, tree.reference());
        assert_eq!(edges[1].child.kind, FlowEntityKind::PurchaseOrder);
    }

    #[test]
    fn entity_serializes_with_kind_tag() {
        let tree = small_tree();
        let json = serde_json::to_value(&tree.entity).expect("serialize");
        assert_eq!(json["kind"], "request");
        assert_eq!(json["record"]["code"], "QMRL-0001");
    }
}
