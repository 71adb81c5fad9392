// src/handlers/restaurants.rs

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
    db::store::RestaurantStore,
    middleware::auth::AuthenticatedUser,
    models::restaurant::{CreateRestaurantPayload, Restaurant, UpdateRestaurantPayload},
};

// POST /restaurants
#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "Restaurants",
    request_body = CreateRestaurantPayload,
    responses(
        (status = 201, description = "Restaurante criado", body = Restaurant),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_restaurant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRestaurantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let restaurant = app_state.restaurant_repo.create(user.0.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(restaurant)))
}

// GET /restaurants
#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "Restaurants",
    responses(
        (status = 200, description = "Restaurantes do usuário", body = Vec<Restaurant>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_restaurants(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    let restaurants = app_state.restaurant_repo.list_by_owner(user.0.id).await?;
    Ok(Json(restaurants))
}

// GET /restaurants/{id}
#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    tag = "Restaurants",
    responses(
        (status = 200, description = "Restaurante", body = Restaurant),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_restaurant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Restaurant>, AppError> {
    let restaurant = app_state
        .restaurant_repo
        .find_by_id_and_owner(id, user.0.id)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    Ok(Json(restaurant))
}

// PUT /restaurants/{id}
#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    tag = "Restaurants",
    request_body = UpdateRestaurantPayload,
    responses(
        (status = 200, description = "Restaurante atualizado", body = Restaurant),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_restaurant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRestaurantPayload>,
) -> Result<Json<Restaurant>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let restaurant = app_state
        .restaurant_repo
        .update(id, user.0.id, &payload)
        .await?
        .ok_or(AppError::RestaurantNotFound)?;

    Ok(Json(restaurant))
}

// DELETE /restaurants/{id}
#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    tag = "Restaurants",
    responses(
        (status = 204, description = "Restaurante removido"),
        (status = 404, description = "Restaurante não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do restaurante")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_restaurant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.restaurant_repo.delete(id, user.0.id).await?;

    if deleted == 0 {
        return Err(AppError::RestaurantNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
