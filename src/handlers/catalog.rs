// src/handlers/catalog.rs

use axum::{extract::State, Json};

use crate::{common::error::AppError, config::AppState, models::catalog::Product};

// GET /products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    responses(
        (status = 200, description = "Catálogo global de produtos", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state.product_repo.list_all().await?;
    Ok(Json(products))
}
