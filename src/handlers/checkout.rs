// src/handlers/checkout.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::payment::{AuthenticatedCheckoutPayload, CheckoutResponse, PublicCheckoutPayload},
};

// POST /checkout/authenticated
#[utoipa::path(
    post,
    path = "/checkout/authenticated",
    tag = "Checkout",
    request_body = AuthenticatedCheckoutPayload,
    responses(
        (status = 200, description = "Sessão de checkout criada", body = CheckoutResponse),
        (status = 400, description = "Subconta ausente ou recusa do processador"),
        (status = 404, description = "Restaurante ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_authenticated_checkout(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AuthenticatedCheckoutPayload>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let checkout_url = app_state
        .checkout_service
        .create_authenticated_checkout(payload.product_id, payload.restaurant_id, user.0.id)
        .await?;

    Ok(Json(CheckoutResponse { checkout_url }))
}

// POST /checkout/public
// Endpoint público, invocado pela página do cardápio — sem autenticação por
// desenho.
#[utoipa::path(
    post,
    path = "/checkout/public",
    tag = "Checkout",
    request_body = PublicCheckoutPayload,
    responses(
        (status = 200, description = "Sessão de checkout criada", body = CheckoutResponse),
        (status = 400, description = "Itens ausentes, subconta ausente ou recusa do processador"),
        (status = 404, description = "Restaurante não encontrado")
    )
)]
pub async fn create_public_checkout(
    State(app_state): State<AppState>,
    Json(payload): Json<PublicCheckoutPayload>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let checkout_url = app_state
        .checkout_service
        .create_public_checkout(payload.restaurant_id, &payload.items)
        .await?;

    Ok(Json(CheckoutResponse { checkout_url }))
}
