// src/models/restaurant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Restaurant (O "Estabelecimento")
// ---
// Pertence a exatamente um usuário. Os campos stripe_* são preenchidos pelo
// gerenciador de subcontas; stripe_account_id recebe valor uma única vez.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,

    pub stripe_account_id: Option<String>,
    // Último retrato conhecido das capacidades; pode estar defasado entre
    // consultas de status.
    pub stripe_charges_enabled: bool,
    pub stripe_payouts_enabled: bool,
    // Último link de onboarding emitido; substituído a cada renovação.
    pub onboarding_link: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Versão pública do restaurante
// ---
// O que o cliente final vê na página pública do cardápio (sem campos de
// integração nem dono).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicRestaurant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl From<Restaurant> for PublicRestaurant {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            email: restaurant.email,
            phone: restaurant.phone,
            address: restaurant.address,
            city: restaurant.city,
            state: restaurant.state,
        }
    }
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantPayload {
    #[validate(length(min = 1, message = "O nome do restaurante é obrigatório."))]
    #[schema(example = "Cafe Zero")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,

    #[schema(example = "CH")]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantPayload {
    #[validate(length(min = 1, message = "O nome do restaurante é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}
