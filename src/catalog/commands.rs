use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use super::{CatalogError, Product};
use crate::storage::{CatalogSession, CatalogStore};

/// Create a product with a server-assigned id.
#[derive(Debug)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl CreateProduct {
    pub async fn execute(self, store: &dyn CatalogStore) -> Result<Uuid, CatalogError> {
        let name = validated_name(self.name)?;
        let price = normalized_price(self.price)?;

        let product = Product {
            id: Uuid::new_v4(),
            name,
            description: self.description,
            price,
        };

        let mut session = store.begin().await?;
        session.add(&product).await?;
        session.persist().await?;

        Ok(product.id)
    }
}

/// Replace every field of an existing product.
#[derive(Debug)]
pub struct UpdateProduct {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No row carried the requested id. The boundary decides how to
    /// report this.
    NotFound,
}

impl UpdateProduct {
    pub async fn execute(self, store: &dyn CatalogStore) -> Result<UpdateOutcome, CatalogError> {
        let name = validated_name(self.name)?;
        let price = normalized_price(self.price)?;

        let mut session = store.begin().await?;
        let Some(existing) = session.find_by_id(self.id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };

        // Wholesale replacement: an omitted description clears the old one
        let replacement = Product {
            id: existing.id,
            name,
            description: self.description,
            price,
        };
        session.add(&replacement).await?;
        session.persist().await?;

        Ok(UpdateOutcome::Updated)
    }
}

/// Remove a product by id.
#[derive(Debug)]
pub struct DeleteProduct {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteProduct {
    pub async fn execute(self, store: &dyn CatalogStore) -> Result<DeleteOutcome, CatalogError> {
        let mut session = store.begin().await?;
        let Some(existing) = session.find_by_id(self.id).await? else {
            return Ok(DeleteOutcome::NotFound);
        };

        session.remove(&existing).await?;
        session.persist().await?;

        Ok(DeleteOutcome::Deleted)
    }
}

fn validated_name(name: String) -> Result<String, CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation(
            "name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

/// Reject negative prices and pin everything else to two decimal places,
/// so 19.9 and 19.90 store identically.
fn normalized_price(price: Decimal) -> Result<Decimal, CatalogError> {
    if price < Decimal::ZERO {
        return Err(CatalogError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    let mut normalized = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    normalized.rescale(2);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn decimal(raw: &str) -> Decimal {
        raw.parse().expect("decimal")
    }

    fn seeded(name: &str, price: &str) -> (MemoryStore, Uuid) {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some("original".to_string()),
            price: decimal(price),
        };
        let id = product.id;
        (MemoryStore::with_products(vec![product]), id)
    }

    #[tokio::test]
    async fn create_assigns_an_id_and_persists_the_product() {
        let store = MemoryStore::new();
        let command = CreateProduct {
            name: "Widget".to_string(),
            description: Some("A widget".to_string()),
            price: decimal("9.99"),
        };

        let id = command.execute(&store).await.unwrap();

        let rows = store.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].price.to_string(), "9.99");
    }

    #[tokio::test]
    async fn create_pins_prices_to_two_decimal_places() {
        let store = MemoryStore::new();
        for raw in ["19.9", "19.90", "19.897"] {
            let command = CreateProduct {
                name: "Widget".to_string(),
                description: None,
                price: decimal(raw),
            };
            command.execute(&store).await.unwrap();
        }

        let prices: Vec<String> = store
            .snapshot()
            .iter()
            .map(|p| p.price.to_string())
            .collect();
        assert_eq!(prices, vec!["19.90", "19.90", "19.90"]);
    }

    #[tokio::test]
    async fn create_rejects_blank_names_without_touching_the_store() {
        let store = MemoryStore::new();
        let command = CreateProduct {
            name: "   ".to_string(),
            description: None,
            price: decimal("1.00"),
        };

        let err = command.execute(&store).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_negative_prices() {
        let store = MemoryStore::new();
        let command = CreateProduct {
            name: "Widget".to_string(),
            description: None,
            price: decimal("-0.01"),
        };

        let err = command.execute(&store).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let (store, id) = seeded("Widget", "9.99");
        let command = UpdateProduct {
            id,
            name: "Gadget".to_string(),
            description: None,
            price: decimal("19.99"),
        };

        let outcome = command.execute(&store).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);

        let rows = store.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Gadget");
        // The omitted description did not survive from the old row
        assert_eq!(rows[0].description, None);
        assert_eq!(rows[0].price.to_string(), "19.99");
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_not_found_and_changes_nothing() {
        let (store, _) = seeded("Widget", "9.99");
        let before = store.snapshot();

        let command = UpdateProduct {
            id: Uuid::new_v4(),
            name: "Gadget".to_string(),
            description: None,
            price: decimal("19.99"),
        };

        let outcome = command.execute(&store).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (store, id) = seeded("Widget", "9.99");

        let outcome = DeleteProduct { id }.execute(&store).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_reports_not_found() {
        let store = MemoryStore::new();

        let outcome = DeleteProduct { id: Uuid::new_v4() }
            .execute(&store)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }
}
