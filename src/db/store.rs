// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{catalog::Product, menu::MenuToken, restaurant::Restaurant},
};

// As interfaces de persistência que os serviços do núcleo recebem por
// injeção no construtor. As implementações reais ficam nos repositórios
// sqlx deste módulo; os testes usam dublês em memória.

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, AppError>;

    /// Busca escopada pelo dono. Um restaurante de outro dono é indistinguível
    /// de um restaurante inexistente.
    async fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Restaurant>, AppError>;

    async fn set_payment_account(&self, id: Uuid, account_id: &str) -> Result<(), AppError>;

    async fn set_onboarding_link(&self, id: Uuid, link: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;
}

#[async_trait]
pub trait MenuTokenStore: Send + Sync {
    async fn find_by_restaurant(&self, restaurant_id: Uuid)
        -> Result<Option<MenuToken>, AppError>;

    async fn find_by_token(&self, public_token: &str) -> Result<Option<MenuToken>, AppError>;

    /// Insere um token recém-gerado. Uma violação de unicidade do token vira
    /// `AppError::TokenCollision`, nunca é engolida.
    async fn insert(&self, restaurant_id: Uuid, public_token: &str)
        -> Result<MenuToken, AppError>;

    async fn delete_by_restaurant(&self, restaurant_id: Uuid) -> Result<u64, AppError>;
}
