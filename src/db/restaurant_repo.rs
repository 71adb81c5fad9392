// src/db/restaurant_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::RestaurantStore,
    models::restaurant::{CreateRestaurantPayload, Restaurant, UpdateRestaurantPayload},
};

#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        payload: &CreateRestaurantPayload,
    ) -> Result<Restaurant, AppError> {
        sqlx::query_as::<_, Restaurant>(
            r#"
            INSERT INTO restaurants (user_id, name, email, phone, address, city, state, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.postal_code)
        .bind(payload.country.as_deref().unwrap_or("CH"))
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Restaurant>, AppError> {
        sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        payload: &UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>, AppError> {
        sqlx::query_as::<_, Restaurant>(
            r#"
            UPDATE restaurants
            SET name = $3, email = $4, phone = $5, address = $6, city = $7,
                state = $8, postal_code = $9, country = $10, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.postal_code)
        .bind(payload.country.as_deref().unwrap_or("CH"))
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // A exclusão não é guardada contra uma subconta pendurada no processador:
    // apagar um restaurante com stripe_account_id deixa a subconta órfã.
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RestaurantStore for RestaurantRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, AppError> {
        sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Restaurant>, AppError> {
        sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn set_payment_account(&self, id: Uuid, account_id: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE restaurants SET stripe_account_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_onboarding_link(&self, id: Uuid, link: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE restaurants SET onboarding_link = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(link)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
