use procura_domain::DroppedRow;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid exchange rate {rate} for {currency}")]
    InvalidExchangeRate { currency: String, rate: f64 },
    #[error("Dangling reference: {0}")]
    DanglingReference(DroppedRow),
    #[error("Route mismatch: {0}")]
    RouteMismatch(DroppedRow),
    #[error("Duplicate row: {0}")]
    DuplicateRow(DroppedRow),
}
