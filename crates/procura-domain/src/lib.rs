//! procura-domain
//!
//! Pure domain models (requests, sub-requests, ledgers, purchase orders, invoices,
//! stock movements and the flow tree). No I/O, no storage. Only data types and core enums.

pub mod common;
pub mod flow;
pub mod inventory;
pub mod ledger;
pub mod progress;
pub mod purchasing;
pub mod request;

pub use common::*;
pub use flow::*;
pub use inventory::*;
pub use ledger::*;
pub use progress::*;
pub use purchasing::*;
pub use request::*;
