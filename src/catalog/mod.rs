pub mod commands;
pub mod product;
pub mod queries;

pub use commands::{CreateProduct, DeleteOutcome, DeleteProduct, UpdateOutcome, UpdateProduct};
pub use product::Product;
pub use queries::ListProducts;

use thiserror::Error;

use crate::storage::StoreError;

/// Failures surfaced by catalog commands and queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The input never reached the store.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
