// src/models/menu.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::restaurant::PublicRestaurant;

// ---
// 1. MenuItem (Item do cardápio de um restaurante)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. MenuToken (O token público do cardápio)
// ---
// No máximo um token vivo por restaurante. Um token rotacionado deixa de
// resolver; nunca é reaproveitado para outro restaurante.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuToken {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub public_token: String,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemPayload {
    #[validate(length(min = 1, message = "O nome do item é obrigatório."))]
    #[schema(example = "Margherita Pizza")]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "O preço deve ser maior que zero."))]
    #[schema(example = 1850)]
    pub price_cents: i64,

    #[schema(example = "chf")]
    pub currency: Option<String>,

    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemPayload {
    #[validate(length(min = 1, message = "O nome do item é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "O preço deve ser maior que zero."))]
    pub price_cents: i64,

    pub currency: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

// ---
// 4. Respostas
// ---
// Visão do dono: itens + token público atual (se existir)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerMenuResponse {
    pub items: Vec<MenuItem>,
    pub public_token: Option<String>,
}

// Visão pública, resolvida a partir do token
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicMenuResponse {
    pub restaurant: PublicRestaurant,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuTokenResponse {
    pub public_token: String,
    pub public_url: String,
}
