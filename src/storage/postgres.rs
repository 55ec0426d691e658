use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{CatalogSession, CatalogStore, Staged, StoreError};
use crate::catalog::product::Product;
use crate::config::DatabaseConfig;

const SELECT_PRODUCT: &str = "SELECT id, name, description, price FROM products";

/// PostgreSQL-backed catalog store.
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a connection pool from configuration and connect.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    /// The underlying pool, for running migrations at startup.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn begin(&self) -> Result<Box<dyn CatalogSession>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgCatalogSession {
            tx,
            staged: Vec::new(),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Session over a single transaction. Dropping it without persisting rolls
/// the transaction back, taking any staged changes with it.
pub struct PgCatalogSession {
    tx: Transaction<'static, Postgres>,
    staged: Vec<Staged>,
}

#[async_trait]
impl CatalogSession for PgCatalogSession {
    async fn add(&mut self, product: &Product) -> Result<(), StoreError> {
        self.staged.push(Staged::Save(product.clone()));
        Ok(())
    }

    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product =
            sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(product)
    }

    async fn list(&mut self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(SELECT_PRODUCT)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(products)
    }

    async fn remove(&mut self, product: &Product) -> Result<(), StoreError> {
        self.staged.push(Staged::Delete(product.id));
        Ok(())
    }

    async fn persist(self: Box<Self>) -> Result<(), StoreError> {
        let PgCatalogSession { mut tx, staged } = *self;
        for change in staged {
            match change {
                Staged::Save(product) => {
                    sqlx::query(
                        "INSERT INTO products (id, name, description, price) \
                         VALUES ($1, $2, $3, $4) \
                         ON CONFLICT (id) DO UPDATE SET \
                         name = EXCLUDED.name, \
                         description = EXCLUDED.description, \
                         price = EXCLUDED.price",
                    )
                    .bind(product.id)
                    .bind(&product.name)
                    .bind(&product.description)
                    .bind(product.price)
                    .execute(&mut *tx)
                    .await?;
                }
                Staged::Delete(id) => {
                    sqlx::query("DELETE FROM products WHERE id = $1")
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }
        tx.commit().await?;
        Ok(())
    }
}
