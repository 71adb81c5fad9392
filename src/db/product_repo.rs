// src/db/product_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::store::ProductStore, models::catalog::Product};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
