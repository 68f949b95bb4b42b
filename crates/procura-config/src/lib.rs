//! procura-config
//!
//! Installation preferences for Procura dashboards.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, FlowSettings, NumberStyle, StockAlertSettings};
