pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::product::Product;

/// Storage failures, classified by what the caller can do about them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation did not complete.
    /// Retryable once the store is back.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    /// The store rejected staged changes at persist time.
    #[error("storage constraint violated: {0}")]
    Constraint(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // SQLSTATE class 23 is integrity violations, class 22 is bad data
        // values; both mean the staged changes themselves were rejected.
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if code.starts_with("23") || code.starts_with("22") {
                    return StoreError::Constraint(err);
                }
            }
        }
        StoreError::Unavailable(err)
    }
}

/// A change staged in a session, applied when the session persists.
#[derive(Debug, Clone)]
pub(crate) enum Staged {
    /// Insert the product, or replace the row wholesale if the id exists.
    Save(Product),
    Delete(Uuid),
}

/// Hand-off point to the storage backend. One session per unit of work.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Open a session. Postgres-backed sessions hold a transaction for
    /// their whole lifetime.
    async fn begin(&self) -> Result<Box<dyn CatalogSession>, StoreError>;

    /// Connectivity check for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// A unit of work against the catalog. Reads execute immediately inside
/// the session; writes are staged and only reach the store on [`persist`].
/// Dropping a session discards everything it staged.
///
/// [`persist`]: CatalogSession::persist
#[async_trait]
pub trait CatalogSession: Send {
    /// Stage the given product state for insertion, or for wholesale
    /// replacement when the id already exists.
    async fn add(&mut self, product: &Product) -> Result<(), StoreError>;

    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Every product, in storage-native order. Callers must not rely on
    /// any particular ordering.
    async fn list(&mut self) -> Result<Vec<Product>, StoreError>;

    /// Stage removal of the given product's row.
    async fn remove(&mut self, product: &Product) -> Result<(), StoreError>;

    /// Apply staged changes and commit. Constraint violations surface
    /// here, not at staging time.
    async fn persist(self: Box<Self>) -> Result<(), StoreError>;
}
