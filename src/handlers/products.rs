use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{
    CreateProduct, DeleteOutcome, DeleteProduct, ListProducts, Product, UpdateOutcome,
    UpdateProduct,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

/// Update bodies carry the id as well; it must agree with the path.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

/// GET /products - every product, as a bare JSON array
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = ListProducts.execute(state.store.as_ref()).await?;
    Ok(Json(products))
}

/// POST /products - create a product, answering 201 with the new id
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Uuid>), ApiError> {
    let Json(body) = body?;
    let command = CreateProduct {
        name: body.name,
        description: body.description,
        price: body.price,
    };
    let id = command.execute(state.store.as_ref()).await?;
    tracing::info!(%id, subject = %user.subject, "product created");
    Ok((StatusCode::CREATED, Json(id)))
}

/// PUT /products/:id - replace the product wholesale, answering 204
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let Json(body) = body?;
    if body.id != id {
        return Err(ApiError::bad_request("body id does not match path id"));
    }

    let command = UpdateProduct {
        id,
        name: body.name,
        description: body.description,
        price: body.price,
    };
    match command.execute(state.store.as_ref()).await? {
        UpdateOutcome::Updated => {
            tracing::info!(%id, subject = %user.subject, "product updated");
        }
        // Still 204 on the wire; the miss shows up only in the log
        UpdateOutcome::NotFound => {
            tracing::warn!(%id, subject = %user.subject, "update of unknown product was a no-op");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /products/:id - remove the product, answering 204 whether or
/// not the row existed
pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let command = DeleteProduct { id };
    match command.execute(state.store.as_ref()).await? {
        DeleteOutcome::Deleted => {
            tracing::info!(%id, subject = %user.subject, "product deleted");
        }
        DeleteOutcome::NotFound => {
            tracing::warn!(%id, subject = %user.subject, "delete of unknown product was a no-op");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
