#![doc(test(attr(deny(warnings))))]

//! Procura turns already-fetched procurement rows (requests, sub-requests, purchase
//! orders, invoices, stock movements) into balances, progress figures and lineage
//! trees for dashboard views.

pub mod dashboard;
pub mod errors;
pub mod utils;

pub use dashboard::{
    Dashboard, PurchaseOrderOverview, RequestOverview, RequestSnapshot, SubRequestBalance,
};
pub use errors::ProcuraError;
pub use procura_config;
pub use procura_core;
pub use procura_domain;

use procura_config::Config;

/// Initializes global tracing with the default `procura=info` directive.
pub fn init() {
    utils::init_tracing(&Config::default_log_filter());
}

/// Initializes global tracing with the directive stored in `config`.
pub fn init_with_config(config: &Config) {
    utils::init_tracing(&config.log_filter);
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
