// src/handlers/payments.rs
//
// Rotas do ciclo de vida da subconta de pagamento de um restaurante.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::payment::{AccountCreatedResponse, AccountStatus, OnboardingLinkResponse},
};

// POST /restaurants/{id}/account/create
#[utoipa::path(
    post,
    path = "/restaurants/{id}/account/create",
    tag = "Payment Accounts",
    responses(
        (status = 200, description = "Subconta criada e link de onboarding emitido", body = AccountCreatedResponse),
        (status = 400, description = "Processador recusou a criação"),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payment_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountCreatedResponse>, AppError> {
    let (account_id, onboarding_url) = app_state
        .payment_account_service
        .create_account(id, user.0.id)
        .await?;

    Ok(Json(AccountCreatedResponse {
        account_id,
        onboarding_url,
    }))
}

// GET /restaurants/{id}/account/status
#[utoipa::path(
    get,
    path = "/restaurants/{id}/account/status",
    tag = "Payment Accounts",
    responses(
        (status = 200, description = "Retrato atual da subconta", body = AccountStatus),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_account_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountStatus>, AppError> {
    let status = app_state
        .payment_account_service
        .get_status(id, user.0.id)
        .await?;

    Ok(Json(status))
}

// GET /restaurants/{id}/account/refresh
#[utoipa::path(
    get,
    path = "/restaurants/{id}/account/refresh",
    tag = "Payment Accounts",
    responses(
        (status = 200, description = "Novo link de onboarding", body = OnboardingLinkResponse),
        (status = 400, description = "Subconta ainda não criada"),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_onboarding(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OnboardingLinkResponse>, AppError> {
    let onboarding_url = app_state
        .payment_account_service
        .refresh_onboarding(id, user.0.id)
        .await?;

    Ok(Json(OnboardingLinkResponse { onboarding_url }))
}
