//! Rebuilds a request's lineage tree from flat relational rows.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use procura_domain::{
    DropReason, DroppedRow, FinancialTransaction, FlowEntity, FlowEntityKind, FlowNode, FlowRef,
    FlowRows, Identifiable, Invoice, PurchaseOrder, Request, RouteType, StockOutRequest,
    StockTransaction, SubRequest,
};

use crate::{CoreError, CoreResult};

/// Tree plus the rows that could not be placed in it.
#[derive(Debug, Clone)]
pub struct FlowBuild {
    pub tree: FlowNode,
    pub dropped: Vec<DroppedRow>,
}

impl FlowBuild {
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Children grouped under their parent id, each group in input order.
type Groups<'a, T> = HashMap<Uuid, Vec<&'a T>>;

/// Groups each row list by parent key and hangs the groups under their parents.
pub struct FlowTreeBuilder;

impl FlowTreeBuilder {
    /// Builds the tree, silently leaving out rows with dangling or misrouted parents.
    pub fn build(root: &Request, rows: &FlowRows) -> FlowNode {
        Self::build_with_report(root, rows).tree
    }

    /// Builds the tree and fails on the first row that cannot be placed.
    pub fn build_strict(root: &Request, rows: &FlowRows) -> CoreResult<FlowNode> {
        let build = Self::build_with_report(root, rows);
        match build.dropped.first() {
            None => Ok(build.tree),
            Some(row) => Err(match row.reason {
                DropReason::RouteMismatch { .. } => CoreError::RouteMismatch(*row),
                DropReason::Duplicate => CoreError::DuplicateRow(*row),
                DropReason::MissingParent { .. } | DropReason::Unlinked => {
                    CoreError::DanglingReference(*row)
                }
            }),
        }
    }

    pub fn build_with_report(root: &Request, rows: &FlowRows) -> FlowBuild {
        let mut linker = Linker::default();

        let mut sub_requests: Vec<&SubRequest> = Vec::new();
        for sub in &rows.sub_requests {
            if !linker.claim(FlowEntityKind::SubRequest, sub.id) {
                continue;
            }
            if sub.request_id == root.id {
                sub_requests.push(sub);
            } else {
                linker.drop_row(
                    FlowEntityKind::SubRequest,
                    sub.id,
                    DropReason::MissingParent {
                        parent: reference(FlowEntityKind::Request, sub.request_id),
                    },
                );
            }
        }
        let routes: HashMap<Uuid, RouteType> = sub_requests
            .iter()
            .map(|sub| (sub.id, sub.route_type))
            .collect();

        let orders = linker.group_under_sub_requests(
            &rows.purchase_orders,
            FlowEntityKind::PurchaseOrder,
            &routes,
            RouteType::Po,
            |order| order.sub_request_id,
        );
        let financial = linker.group_under_sub_requests(
            &rows.financial_transactions,
            FlowEntityKind::FinancialTransaction,
            &routes,
            RouteType::Expense,
            |txn| txn.sub_request_id,
        );
        let stock_outs = linker.group_under_sub_requests(
            &rows.stock_out_requests,
            FlowEntityKind::StockOutRequest,
            &routes,
            RouteType::Item,
            |request| request.sub_request_id,
        );

        let placed_orders: HashSet<Uuid> = orders
            .values()
            .flatten()
            .map(|order| order.id)
            .collect();
        let invoices = linker.group_under_known(
            &rows.invoices,
            FlowEntityKind::Invoice,
            FlowEntityKind::PurchaseOrder,
            &placed_orders,
            |invoice| invoice.purchase_order_id,
        );
        let placed_invoices: HashSet<Uuid> = invoices
            .values()
            .flatten()
            .map(|invoice| invoice.id)
            .collect();

        let placed_stock_outs: HashMap<Uuid, Uuid> = stock_outs
            .iter()
            .flat_map(|(sub_id, requests)| {
                requests.iter().map(move |request| (request.id, *sub_id))
            })
            .collect();

        let (receipts, issues) = linker.group_stock_transactions(
            &rows.stock_transactions,
            &placed_invoices,
            &placed_stock_outs,
            &routes,
        );

        let groups = LinkedGroups {
            orders,
            invoices,
            receipts,
            financial,
            stock_outs,
            issues,
        };
        let children = sub_requests
            .into_iter()
            .map(|sub| groups.sub_request_node(sub))
            .collect();
        let tree = FlowNode::with_children(FlowEntity::Request(root.clone()), children);

        for row in &linker.dropped {
            debug!(request = %root.code, dropped = %row, "left row out of flow tree");
        }
        FlowBuild {
            tree,
            dropped: linker.dropped,
        }
    }
}

fn reference(kind: FlowEntityKind, id: Uuid) -> FlowRef {
    FlowRef { kind, id }
}

#[derive(Default)]
struct Linker {
    dropped: Vec<DroppedRow>,
    seen: HashSet<FlowRef>,
}

impl Linker {
    /// First occurrence of an id wins; later copies are dropped as duplicates.
    fn claim(&mut self, kind: FlowEntityKind, id: Uuid) -> bool {
        if self.seen.insert(reference(kind, id)) {
            true
        } else {
            self.drop_row(kind, id, DropReason::Duplicate);
            false
        }
    }

    fn drop_row(&mut self, kind: FlowEntityKind, id: Uuid, reason: DropReason) {
        self.dropped.push(DroppedRow {
            row: reference(kind, id),
            reason,
        });
    }

    /// Keeps rows whose sub-request exists and follows `route`.
    fn group_under_sub_requests<'a, T, F>(
        &mut self,
        rows: &'a [T],
        kind: FlowEntityKind,
        routes: &HashMap<Uuid, RouteType>,
        route: RouteType,
        parent_of: F,
    ) -> Groups<'a, T>
    where
        T: Identifiable,
        F: Fn(&T) -> Uuid,
    {
        let mut groups: Groups<'a, T> = HashMap::new();
        for row in rows {
            if !self.claim(kind, row.id()) {
                continue;
            }
            let parent_id = parent_of(row);
            let parent = reference(FlowEntityKind::SubRequest, parent_id);
            match routes.get(&parent_id) {
                Some(found) if *found == route => groups.entry(parent_id).or_default().push(row),
                Some(found) => self.drop_row(
                    kind,
                    row.id(),
                    DropReason::RouteMismatch {
                        parent,
                        route: *found,
                    },
                ),
                None => self.drop_row(kind, row.id(), DropReason::MissingParent { parent }),
            }
        }
        groups
    }

    /// Keeps rows whose parent id is among the already placed `known` ids.
    fn group_under_known<'a, T, F>(
        &mut self,
        rows: &'a [T],
        kind: FlowEntityKind,
        parent_kind: FlowEntityKind,
        known: &HashSet<Uuid>,
        parent_of: F,
    ) -> Groups<'a, T>
    where
        T: Identifiable,
        F: Fn(&T) -> Uuid,
    {
        let mut groups: Groups<'a, T> = HashMap::new();
        for row in rows {
            if !self.claim(kind, row.id()) {
                continue;
            }
            let parent_id = parent_of(row);
            if known.contains(&parent_id) {
                groups.entry(parent_id).or_default().push(row);
            } else {
                self.drop_row(
                    kind,
                    row.id(),
                    DropReason::MissingParent {
                        parent: reference(parent_kind, parent_id),
                    },
                );
            }
        }
        groups
    }

    /// Receipts hang off their invoice; other movements off an item-route sub-request,
    /// named directly or through their stock-out request.
    fn group_stock_transactions<'a>(
        &mut self,
        rows: &'a [StockTransaction],
        invoices: &HashSet<Uuid>,
        stock_outs: &HashMap<Uuid, Uuid>,
        routes: &HashMap<Uuid, RouteType>,
    ) -> (Groups<'a, StockTransaction>, Groups<'a, StockTransaction>) {
        let mut by_invoice: Groups<'a, StockTransaction> = HashMap::new();
        let mut by_sub_request: Groups<'a, StockTransaction> = HashMap::new();
        let kind = FlowEntityKind::StockTransaction;
        for txn in rows {
            if !self.claim(kind, txn.id) {
                continue;
            }
            if let Some(invoice_id) = txn.invoice_id {
                if invoices.contains(&invoice_id) {
                    by_invoice.entry(invoice_id).or_default().push(txn);
                } else {
                    self.drop_row(
                        kind,
                        txn.id,
                        DropReason::MissingParent {
                            parent: reference(FlowEntityKind::Invoice, invoice_id),
                        },
                    );
                }
                continue;
            }

            let sub_id = match (txn.sub_request_id, txn.stock_out_request_id) {
                (Some(sub_id), _) => sub_id,
                (None, Some(request_id)) => match stock_outs.get(&request_id) {
                    Some(sub_id) => *sub_id,
                    None => {
                        self.drop_row(
                            kind,
                            txn.id,
                            DropReason::MissingParent {
                                parent: reference(FlowEntityKind::StockOutRequest, request_id),
                            },
                        );
                        continue;
                    }
                },
                (None, None) => {
                    self.drop_row(kind, txn.id, DropReason::Unlinked);
                    continue;
                }
            };
            let parent = reference(FlowEntityKind::SubRequest, sub_id);
            match routes.get(&sub_id) {
                Some(RouteType::Item) => by_sub_request.entry(sub_id).or_default().push(txn),
                Some(route) => self.drop_row(
                    kind,
                    txn.id,
                    DropReason::RouteMismatch {
                        parent,
                        route: *route,
                    },
                ),
                None => self.drop_row(kind, txn.id, DropReason::MissingParent { parent }),
            }
        }
        (by_invoice, by_sub_request)
    }
}

struct LinkedGroups<'a> {
    orders: Groups<'a, PurchaseOrder>,
    invoices: Groups<'a, Invoice>,
    receipts: Groups<'a, StockTransaction>,
    financial: Groups<'a, FinancialTransaction>,
    stock_outs: Groups<'a, StockOutRequest>,
    issues: Groups<'a, StockTransaction>,
}

impl LinkedGroups<'_> {
    fn sub_request_node(&self, sub: &SubRequest) -> FlowNode {
        let children = match sub.route_type {
            RouteType::Item => {
                let mut children = leaves(&self.stock_outs, sub.id, FlowEntity::StockOutRequest);
                children.extend(leaves(&self.issues, sub.id, FlowEntity::StockTransaction));
                children
            }
            RouteType::Expense => leaves(&self.financial, sub.id, FlowEntity::FinancialTransaction),
            RouteType::Po => self
                .orders
                .get(&sub.id)
                .into_iter()
                .flatten()
                .map(|order| self.order_node(order))
                .collect(),
        };
        FlowNode::with_children(FlowEntity::SubRequest(sub.clone()), children)
    }

    fn order_node(&self, order: &PurchaseOrder) -> FlowNode {
        let children = self
            .invoices
            .get(&order.id)
            .into_iter()
            .flatten()
            .map(|invoice| {
                FlowNode::with_children(
                    FlowEntity::Invoice((*invoice).clone()),
                    leaves(&self.receipts, invoice.id, FlowEntity::StockTransaction),
                )
            })
            .collect();
        FlowNode::with_children(FlowEntity::PurchaseOrder(order.clone()), children)
    }
}

fn leaves<T: Clone>(
    groups: &Groups<'_, T>,
    parent: Uuid,
    wrap: fn(T) -> FlowEntity,
) -> Vec<FlowNode> {
    groups
        .get(&parent)
        .into_iter()
        .flatten()
        .map(|row| FlowNode::leaf(wrap((*row).clone())))
        .collect()
}
