use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductPage, ProductQuery},
    pipeline::guards::{RequireApiKey, ValidProduct},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<(StatusCode, Json<ProductPage>)> {
    let Query(pairs) = pairs.map_err(|rejection| AppError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let query = ProductQuery::from_pairs(pairs);
    let page = state.store.read().await.list(&query);

    info!(
        total = page.total,
        returned = page.data.len(),
        page = query.page(),
        limit = query.limit(),
        "Listed products"
    );

    Ok((StatusCode::OK, Json(page)))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    ValidProduct(fields): ValidProduct,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.store.write().await.insert(fields);

    info!(id = %product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .store
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or(AppError::NotFound("Product"))?;

    info!(id = %id, "Fetched product");

    Ok((StatusCode::OK, Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidProduct(fields): ValidProduct,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .store
        .write()
        .await
        .replace(&id, fields)
        .ok_or(AppError::NotFound("Product"))?;

    info!(id = %id, "Updated product");

    Ok((StatusCode::OK, Json(product)))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: RequireApiKey,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .store
        .write()
        .await
        .remove(&id)
        .ok_or(AppError::NotFound("Product"))?;

    info!(id = %id, "Deleted product");

    Ok((StatusCode::OK, Json(product)))
}
