//! Request letters, their route-typed sub-requests and the rows hanging off them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, ledger::RouteType};

/// Top-level request letter (QMRL).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub status: StatusGroup,
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            title: title.into(),
            status: StatusGroup::default(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Request {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Request {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Displayable for Request {
    fn display_label(&self) -> String {
        format!("{} {} [{}]", self.code, self.title, self.status)
    }
}

/// Route-typed line of work raised against a request (QMHQ).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubRequest {
    pub id: Uuid,
    pub request_id: Uuid,
    pub code: String,
    pub name: String,
    pub route_type: RouteType,
    #[serde(default)]
    pub status: StatusGroup,
    pub created_at: DateTime<Utc>,
}

impl SubRequest {
    pub fn new(
        request_id: Uuid,
        code: impl Into<String>,
        name: impl Into<String>,
        route_type: RouteType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            code: code.into(),
            name: name.into(),
            route_type,
            status: StatusGroup::default(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for SubRequest {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for SubRequest {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for SubRequest {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.code, self.name, self.route_type)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FinancialTransactionKind {
    MoneyIn,
    MoneyOut,
}

impl fmt::Display for FinancialTransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FinancialTransactionKind::MoneyIn => "Money In",
            FinancialTransactionKind::MoneyOut => "Money Out",
        };
        f.write_str(label)
    }
}

/// Money received or paid out against a sub-request, in its original currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialTransaction {
    pub id: Uuid,
    pub sub_request_id: Uuid,
    pub kind: FinancialTransactionKind,
    pub amount: f64,
    pub currency: String,
    pub exchange_rate: f64,
    #[serde(default)]
    pub is_voided: bool,
    pub transaction_date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

impl FinancialTransaction {
    pub fn new(
        sub_request_id: Uuid,
        kind: FinancialTransactionKind,
        amount: f64,
        currency: impl Into<String>,
        exchange_rate: f64,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sub_request_id,
            kind,
            amount,
            currency: currency.into().to_uppercase(),
            exchange_rate,
            is_voided: false,
            transaction_date,
            recorded_at: Utc::now(),
        }
    }
}

impl Identifiable for FinancialTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for FinancialTransaction {
    fn display_label(&self) -> String {
        let voided = if self.is_voided { " (voided)" } else { "" };
        format!(
            "{} {:.2} {} on {}{}",
            self.kind, self.amount, self.currency, self.transaction_date, voided
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockOutStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Executed,
}

impl fmt::Display for StockOutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockOutStatus::Pending => "Pending",
            StockOutStatus::Approved => "Approved",
            StockOutStatus::Rejected => "Rejected",
            StockOutStatus::Executed => "Executed",
        };
        f.write_str(label)
    }
}

/// Request to issue stock for an item-route sub-request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockOutRequest {
    pub id: Uuid,
    pub sub_request_id: Uuid,
    pub item_id: Uuid,
    pub requested_qty: f64,
    #[serde(default)]
    pub status: StockOutStatus,
    pub created_at: DateTime<Utc>,
}

impl StockOutRequest {
    pub fn new(sub_request_id: Uuid, item_id: Uuid, requested_qty: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            sub_request_id,
            item_id,
            requested_qty,
            status: StockOutStatus::default(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for StockOutRequest {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for StockOutRequest {
    fn display_label(&self) -> String {
        format!("Stock-out request {} [{}]", self.requested_qty, self.status)
    }
}
