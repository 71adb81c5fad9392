// src/services/menu_token_service.rs
//
// O token público desacopla a URL do cardápio do id interno do restaurante.
// Invariantes: no máximo um token vivo por restaurante; um token rotacionado
// deixa de resolver e nunca é reaproveitado.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{MenuTokenStore, RestaurantStore},
};

#[derive(Clone)]
pub struct MenuTokenService {
    restaurants: Arc<dyn RestaurantStore>,
    tokens: Arc<dyn MenuTokenStore>,
}

impl MenuTokenService {
    pub fn new(restaurants: Arc<dyn RestaurantStore>, tokens: Arc<dyn MenuTokenStore>) -> Self {
        Self { restaurants, tokens }
    }

    fn generate_token() -> String {
        Uuid::new_v4().to_string()
    }

    /// "Get or create" idempotente: devolve o token vivo do restaurante,
    /// gerando um novo apenas se não existir nenhum.
    pub async fn ensure_token(&self, restaurant_id: Uuid) -> Result<String, AppError> {
        if let Some(existing) = self.tokens.find_by_restaurant(restaurant_id).await? {
            return Ok(existing.public_token);
        }

        let token = Self::generate_token();
        let row = self.tokens.insert(restaurant_id, &token).await?;
        Ok(row.public_token)
    }

    /// Substitui o token por inteiro (delete + insert). Entre as duas
    /// operações o restaurante fica sem token vivo e resoluções concorrentes
    /// recebem `MenuNotFound`; rotação é rara e iniciada pelo dono.
    pub async fn rotate_token(
        &self,
        restaurant_id: Uuid,
        owner_id: Uuid,
    ) -> Result<String, AppError> {
        let restaurant = self
            .restaurants
            .find_by_id_and_owner(restaurant_id, owner_id)
            .await?
            .ok_or(AppError::RestaurantNotFound)?;

        self.tokens.delete_by_restaurant(restaurant.id).await?;

        let token = Self::generate_token();
        let row = self.tokens.insert(restaurant.id, &token).await?;
        Ok(row.public_token)
    }

    /// Consulta pura, sem efeitos colaterais.
    pub async fn resolve(&self, public_token: &str) -> Result<Uuid, AppError> {
        self.tokens
            .find_by_token(public_token)
            .await?
            .map(|token| token.restaurant_id)
            .ok_or(AppError::MenuNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_doubles::{restaurant_fixture, InMemoryMenuTokenStore, InMemoryRestaurantStore};

    fn setup(
        restaurant_id: Uuid,
        owner_id: Uuid,
    ) -> (MenuTokenService, Arc<InMemoryMenuTokenStore>) {
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let tokens = Arc::new(InMemoryMenuTokenStore::default());
        (MenuTokenService::new(restaurants, tokens.clone()), tokens)
    }

    #[tokio::test]
    async fn ensure_token_is_idempotent() {
        let restaurant_id = Uuid::new_v4();
        let (service, tokens) = setup(restaurant_id, Uuid::new_v4());

        let first = service.ensure_token(restaurant_id).await.unwrap();
        let second = service.ensure_token(restaurant_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(tokens.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rotate_kills_old_token_and_leaves_exactly_one() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let (service, tokens) = setup(restaurant_id, owner_id);

        let old_token = service.ensure_token(restaurant_id).await.unwrap();
        let new_token = service.rotate_token(restaurant_id, owner_id).await.unwrap();

        assert_ne!(old_token, new_token);
        assert!(matches!(
            service.resolve(&old_token).await,
            Err(AppError::MenuNotFound)
        ));
        assert_eq!(service.resolve(&new_token).await.unwrap(), restaurant_id);
        assert_eq!(tokens.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn two_rotations_yield_distinct_tokens() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let (service, _) = setup(restaurant_id, owner_id);

        let first = service.rotate_token(restaurant_id, owner_id).await.unwrap();
        let second = service.rotate_token(restaurant_id, owner_id).await.unwrap();

        assert_ne!(first, second);
        assert!(matches!(
            service.resolve(&first).await,
            Err(AppError::MenuNotFound)
        ));
        assert_eq!(service.resolve(&second).await.unwrap(), restaurant_id);
    }

    #[tokio::test]
    async fn rotate_is_owner_scoped() {
        let restaurant_id = Uuid::new_v4();
        let (service, _) = setup(restaurant_id, Uuid::new_v4());

        let result = service.rotate_token(restaurant_id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::RestaurantNotFound)));
    }

    #[tokio::test]
    async fn resolve_unknown_token_is_not_found() {
        let (service, _) = setup(Uuid::new_v4(), Uuid::new_v4());

        let result = service.resolve("token-inexistente").await;

        assert!(matches!(result, Err(AppError::MenuNotFound)));
    }
}
