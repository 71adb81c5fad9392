// src/models/payment.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Estado da subconta de pagamento
// ---
// Retrato ao vivo vindo do processador; nunca é gravado de volta na linha do
// restaurante. `requirements` é repassado exatamente como o processador
// devolveu.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountStatus {
    NotStarted,
    AccountCreated {
        charges_enabled: bool,
        payouts_enabled: bool,
        requirements: Value,
        account_id: String,
    },
}

// ---
// 2. Respostas do ciclo de vida da subconta
// ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreatedResponse {
    pub account_id: String,
    pub onboarding_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLinkResponse {
    pub onboarding_url: String,
}

// ---
// 3. Checkout
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedCheckoutPayload {
    pub product_id: Uuid,
    pub restaurant_id: Uuid,
}

// Um item enviado pelo cliente final na página pública do cardápio.
// O preço unitário vem em centavos e é repassado ao processador como veio.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCheckoutItem {
    #[schema(example = "Margherita Pizza")]
    pub name: String,

    #[schema(example = 1850)]
    pub unit_price: i64,

    #[schema(example = 2)]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCheckoutPayload {
    pub restaurant_id: Uuid,
    pub items: Vec<PublicCheckoutItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}
