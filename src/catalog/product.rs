use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog entry. `id` is assigned by the server on create and never
/// changes; `price` always carries two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Serialized as an exact JSON number; never passes through a binary
    /// float.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}
