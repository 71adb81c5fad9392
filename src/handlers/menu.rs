// src/handlers/menu.rs
//
// Gestão do cardápio pelo dono + a visão pública resolvida por token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::store::{MenuTokenStore, RestaurantStore},
    middleware::auth::AuthenticatedUser,
    models::menu::{
        CreateMenuItemPayload, MenuItem, MenuTokenResponse, OwnerMenuResponse,
        PublicMenuResponse, UpdateMenuItemPayload,
    },
};

// GET /menu/{restaurant_id}
#[utoipa::path(
    get,
    path = "/menu/{restaurant_id}",
    tag = "Menu",
    responses(
        (status = 200, description = "Itens do cardápio + token público atual", body = OwnerMenuResponse),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("restaurant_id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_menu_items(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<OwnerMenuResponse>, AppError> {
    let restaurant = app_state
        .restaurant_repo
        .find_by_id_and_owner(restaurant_id, user.0.id)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    let items = app_state.menu_item_repo.list_by_restaurant(restaurant.id).await?;
    let public_token = app_state
        .menu_tokens
        .find_by_restaurant(restaurant.id)
        .await?
        .map(|token| token.public_token);

    Ok(Json(OwnerMenuResponse { items, public_token }))
}

// POST /menu/{restaurant_id}
#[utoipa::path(
    post,
    path = "/menu/{restaurant_id}",
    tag = "Menu",
    request_body = CreateMenuItemPayload,
    responses(
        (status = 201, description = "Item criado", body = MenuItem),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("restaurant_id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_menu_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(restaurant_id): Path<Uuid>,
    Json(payload): Json<CreateMenuItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let restaurant = app_state
        .restaurant_repo
        .find_by_id_and_owner(restaurant_id, user.0.id)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    // Garante o token público na primeira criação de item. Uma falha aqui não
    // impede o item de ser criado; o dono ainda pode gerar o token depois.
    if let Err(e) = app_state.menu_token_service.ensure_token(restaurant.id).await {
        tracing::warn!("Falha ao garantir o token público do cardápio: {}", e);
    }

    let item = app_state.menu_item_repo.create(restaurant.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /menu/{restaurant_id}/{item_id}
#[utoipa::path(
    put,
    path = "/menu/{restaurant_id}/{item_id}",
    tag = "Menu",
    request_body = UpdateMenuItemPayload,
    responses(
        (status = 200, description = "Item atualizado", body = MenuItem),
        (status = 404, description = "Restaurante ou item não encontrado")
    ),
    params(
        ("restaurant_id" = Uuid, Path, description = "ID do restaurante"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_menu_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((restaurant_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMenuItemPayload>,
) -> Result<Json<MenuItem>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let restaurant = app_state
        .restaurant_repo
        .find_by_id_and_owner(restaurant_id, user.0.id)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    let item = app_state
        .menu_item_repo
        .update(item_id, restaurant.id, &payload)
        .await?
        .ok_or(AppError::MenuNotFound)?;

    Ok(Json(item))
}

// DELETE /menu/{restaurant_id}/{item_id}
#[utoipa::path(
    delete,
    path = "/menu/{restaurant_id}/{item_id}",
    tag = "Menu",
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Restaurante ou item não encontrado")
    ),
    params(
        ("restaurant_id" = Uuid, Path, description = "ID do restaurante"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_menu_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((restaurant_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let restaurant = app_state
        .restaurant_repo
        .find_by_id_and_owner(restaurant_id, user.0.id)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    let deleted = app_state.menu_item_repo.delete(item_id, restaurant.id).await?;

    if deleted == 0 {
        return Err(AppError::MenuNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// POST /menu/{restaurant_id}/token
// Rotaciona o token público: o anterior deixa de resolver imediatamente.
#[utoipa::path(
    post,
    path = "/menu/{restaurant_id}/token",
    tag = "Menu",
    responses(
        (status = 200, description = "Novo token público", body = MenuTokenResponse),
        (status = 404, description = "Restaurante não encontrado"),
        (status = 409, description = "Colisão de token; repita a chamada")
    ),
    params(
        ("restaurant_id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn rotate_menu_token(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<MenuTokenResponse>, AppError> {
    let public_token = app_state
        .menu_token_service
        .rotate_token(restaurant_id, user.0.id)
        .await?;

    let public_url = format!("{}/public/menu/{}", app_state.redirect_base_url, public_token);

    Ok(Json(MenuTokenResponse {
        public_token,
        public_url,
    }))
}

// GET /menu/public/{token}
// Página pública do cardápio: resolve o token e devolve a visão do cliente
// final, sem autenticação.
#[utoipa::path(
    get,
    path = "/menu/public/{token}",
    tag = "Menu",
    responses(
        (status = 200, description = "Cardápio público", body = PublicMenuResponse),
        (status = 404, description = "Cardápio não encontrado")
    ),
    params(
        ("token" = String, Path, description = "Token público do cardápio")
    )
)]
pub async fn get_public_menu(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicMenuResponse>, AppError> {
    let restaurant_id = app_state.menu_token_service.resolve(&token).await?;

    let restaurant = app_state
        .restaurant_repo
        .find_by_id(restaurant_id)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    let items = app_state
        .menu_item_repo
        .list_available_by_restaurant(restaurant_id)
        .await?;

    Ok(Json(PublicMenuResponse {
        restaurant: restaurant.into(),
        items,
    }))
}
