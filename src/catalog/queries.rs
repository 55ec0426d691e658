use super::{CatalogError, Product};
use crate::storage::{CatalogSession, CatalogStore};

/// Fetch every product. Order reflects whatever the store returns.
#[derive(Debug)]
pub struct ListProducts;

impl ListProducts {
    pub async fn execute(self, store: &dyn CatalogStore) -> Result<Vec<Product>, CatalogError> {
        let mut session = store.begin().await?;
        Ok(session.list().await?)
    }
}
