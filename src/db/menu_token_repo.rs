// src/db/menu_token_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::store::MenuTokenStore, models::menu::MenuToken};

#[derive(Clone)]
pub struct MenuTokenRepository {
    pool: PgPool,
}

impl MenuTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuTokenStore for MenuTokenRepository {
    async fn find_by_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Option<MenuToken>, AppError> {
        sqlx::query_as::<_, MenuToken>(
            "SELECT * FROM menu_tokens WHERE restaurant_id = $1 LIMIT 1",
        )
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_token(&self, public_token: &str) -> Result<Option<MenuToken>, AppError> {
        sqlx::query_as::<_, MenuToken>("SELECT * FROM menu_tokens WHERE public_token = $1")
            .bind(public_token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn insert(
        &self,
        restaurant_id: Uuid,
        public_token: &str,
    ) -> Result<MenuToken, AppError> {
        sqlx::query_as::<_, MenuToken>(
            "INSERT INTO menu_tokens (restaurant_id, public_token) VALUES ($1, $2) RETURNING *",
        )
        .bind(restaurant_id)
        .bind(public_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A restrição UNIQUE do banco é a segunda linha de defesa contra
            // colisões do gerador; o chamador recebe um erro repetível.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::TokenCollision;
                }
            }
            AppError::from(e)
        })
    }

    async fn delete_by_restaurant(&self, restaurant_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM menu_tokens WHERE restaurant_id = $1")
            .bind(restaurant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
