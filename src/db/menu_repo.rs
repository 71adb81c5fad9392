// src/db/menu_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::menu::{CreateMenuItemPayload, MenuItem, UpdateMenuItemPayload},
};

#[derive(Clone)]
pub struct MenuItemRepository {
    pool: PgPool,
}

impl MenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Visão do dono: todos os itens, inclusive indisponíveis
    pub async fn list_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE restaurant_id = $1 ORDER BY category, name",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // Visão pública: apenas itens disponíveis
    pub async fn list_available_by_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE restaurant_id = $1 AND available ORDER BY category, name",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn create(
        &self,
        restaurant_id: Uuid,
        payload: &CreateMenuItemPayload,
    ) -> Result<MenuItem, AppError> {
        sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_items (restaurant_id, name, description, price_cents, currency, category, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(restaurant_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price_cents)
        .bind(payload.currency.as_deref().unwrap_or("chf"))
        .bind(&payload.category)
        .bind(&payload.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        item_id: Uuid,
        restaurant_id: Uuid,
        payload: &UpdateMenuItemPayload,
    ) -> Result<Option<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items
            SET name = $3, description = $4, price_cents = $5, currency = $6,
                category = $7, image_url = $8, available = $9, updated_at = NOW()
            WHERE id = $1 AND restaurant_id = $2
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(restaurant_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price_cents)
        .bind(payload.currency.as_deref().unwrap_or("chf"))
        .bind(&payload.category)
        .bind(&payload.image_url)
        .bind(payload.available.unwrap_or(true))
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn delete(&self, item_id: Uuid, restaurant_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND restaurant_id = $2")
            .bind(item_id)
            .bind(restaurant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
