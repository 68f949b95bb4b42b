//! procura-core
//!
//! Balance, progress, inventory and lineage computations for Procura.
//! Depends on procura-domain. Every service is a pure function over a snapshot of
//! already-fetched rows: no storage, no network, no shared state.

pub mod balance_service;
pub mod currency;
pub mod error;
pub mod flow_service;
pub mod inventory_service;
pub mod progress_service;
pub mod public_api;

pub use balance_service::*;
pub use error::{CoreError, CoreResult};
pub use flow_service::*;
pub use inventory_service::*;
pub use progress_service::*;
pub use public_api::*;
