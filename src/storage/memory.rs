use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::{CatalogSession, CatalogStore, Staged, StoreError};
use crate::catalog::product::Product;

/// In-memory store with the same staged-session semantics as the Postgres
/// backend. Substitutes for the database in tests; rows live in insertion
/// order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Vec<Product>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(products)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Snapshot of committed rows.
    pub fn snapshot(&self) -> Vec<Product> {
        self.lock().clone()
    }

    /// Make every subsequent session and ping fail as if the store were
    /// unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Product>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn CatalogSession>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
        }
        Ok(Box::new(MemorySession {
            store: self.clone(),
            staged: Vec::new(),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

struct MemorySession {
    store: MemoryStore,
    staged: Vec<Staged>,
}

#[async_trait]
impl CatalogSession for MemorySession {
    async fn add(&mut self, product: &Product) -> Result<(), StoreError> {
        self.staged.push(Staged::Save(product.clone()));
        Ok(())
    }

    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.store.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&mut self) -> Result<Vec<Product>, StoreError> {
        Ok(self.store.lock().clone())
    }

    async fn remove(&mut self, product: &Product) -> Result<(), StoreError> {
        self.staged.push(Staged::Delete(product.id));
        Ok(())
    }

    async fn persist(self: Box<Self>) -> Result<(), StoreError> {
        let mut rows = self.store.lock();
        for change in &self.staged {
            match change {
                Staged::Save(product) => {
                    match rows.iter_mut().find(|p| p.id == product.id) {
                        Some(slot) => *slot = product.clone(),
                        None => rows.push(product.clone()),
                    }
                }
                Staged::Delete(id) => rows.retain(|p| p.id != *id),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: "1.00".parse().expect("price"),
        }
    }

    #[tokio::test]
    async fn staged_changes_are_invisible_until_persist() {
        let store = MemoryStore::new();
        let product = sample("Widget");

        let mut session = store.begin().await.unwrap();
        session.add(&product).await.unwrap();
        assert!(store.snapshot().is_empty());

        session.persist().await.unwrap();
        assert_eq!(store.snapshot(), vec![product]);
    }

    #[tokio::test]
    async fn dropped_session_discards_staged_changes() {
        let store = MemoryStore::new();

        let mut session = store.begin().await.unwrap();
        session.add(&sample("Widget")).await.unwrap();
        drop(session);

        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn saving_an_existing_id_replaces_the_row() {
        let original = sample("Widget");
        let store = MemoryStore::with_products(vec![original.clone()]);

        let mut replacement = original.clone();
        replacement.name = "Gadget".to_string();

        let mut session = store.begin().await.unwrap();
        session.add(&replacement).await.unwrap();
        session.persist().await.unwrap();

        assert_eq!(store.snapshot(), vec![replacement]);
    }

    #[tokio::test]
    async fn unavailable_store_refuses_sessions() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.begin().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
