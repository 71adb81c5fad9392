// src/services/payment_account_service.rs
//
// O ciclo de vida da subconta de pagamento de um restaurante:
// NO_ACCOUNT -> (create_account) -> pendente de onboarding -> (o processador
// habilita charges/payouts, observado via get_status) -> ativa. Nada aqui
// remove uma subconta; desativação é decisão do processador e só é observada.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::RestaurantStore,
    models::{payment::AccountStatus, restaurant::Restaurant},
    stripe::{BusinessProfile, NewProcessorAccount, PaymentProcessor, SupportAddress},
};

// Endereço público do perfil de negócio enviado ao processador
const BUSINESS_PROFILE_URL_BASE: &str = "https://restaurant-platform.test";

#[derive(Clone)]
pub struct PaymentAccountService {
    restaurants: Arc<dyn RestaurantStore>,
    processor: Arc<dyn PaymentProcessor>,
    redirect_base_url: String,
}

impl PaymentAccountService {
    pub fn new(
        restaurants: Arc<dyn RestaurantStore>,
        processor: Arc<dyn PaymentProcessor>,
        redirect_base_url: String,
    ) -> Self {
        Self {
            restaurants,
            processor,
            redirect_base_url,
        }
    }

    // Monta o perfil de negócio a partir do restaurante. Sub-campos vazios do
    // endereço nunca são enviados; sem nenhum campo de endereço preenchido, o
    // support_address é omitido por inteiro (o país sozinho não conta como
    // endereço).
    fn business_profile_for(restaurant: &Restaurant) -> BusinessProfile {
        fn filled(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        let line1 = filled(&restaurant.address);
        let city = filled(&restaurant.city);
        let state = filled(&restaurant.state);
        let postal_code = filled(&restaurant.postal_code);

        let has_address =
            line1.is_some() || city.is_some() || state.is_some() || postal_code.is_some();

        let support_address = has_address.then(|| SupportAddress {
            line1,
            city,
            state,
            postal_code,
            country: (!restaurant.country.is_empty()).then(|| restaurant.country.clone()),
        });

        BusinessProfile {
            name: restaurant.name.clone(),
            url: format!("{}/restaurants/{}", BUSINESS_PROFILE_URL_BASE, restaurant.id),
            support_address,
        }
    }

    /// Cria a subconta "express" do restaurante e já emite o primeiro link de
    /// onboarding. Em caso de recusa do processador, nada é persistido.
    ///
    /// Chamar de novo com uma subconta já criada sobrescreve o id armazenado
    /// e deixa a subconta anterior órfã no processador; defeito conhecido,
    /// registrado em DESIGN.md.
    pub async fn create_account(
        &self,
        restaurant_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(String, String), AppError> {
        let restaurant = self
            .restaurants
            .find_by_id_and_owner(restaurant_id, owner_id)
            .await?
            .ok_or(AppError::RestaurantNotFound)?;

        let new_account = NewProcessorAccount {
            country: restaurant.country.clone(),
            email: restaurant.email.clone(),
            business_profile: Self::business_profile_for(&restaurant),
        };

        let account_id = self.processor.create_account(&new_account).await?;
        self.restaurants
            .set_payment_account(restaurant.id, &account_id)
            .await?;

        tracing::info!("✅ Subconta {} criada para o restaurante {}", account_id, restaurant.id);

        let onboarding_url = self.issue_onboarding_link(restaurant.id, &account_id).await?;
        Ok((account_id, onboarding_url))
    }

    /// Emite um link de onboarding e o persiste, sobrescrevendo o anterior
    /// (links são de curta duração por contrato do processador).
    pub async fn issue_onboarding_link(
        &self,
        restaurant_id: Uuid,
        account_id: &str,
    ) -> Result<String, AppError> {
        let refresh_url = format!(
            "{}/restaurants/{}/stripe/refresh",
            self.redirect_base_url, restaurant_id
        );
        let return_url = format!(
            "{}/restaurants/{}/stripe/return",
            self.redirect_base_url, restaurant_id
        );

        let onboarding_url = self
            .processor
            .create_onboarding_link(account_id, &refresh_url, &return_url)
            .await?;

        self.restaurants
            .set_onboarding_link(restaurant_id, &onboarding_url)
            .await?;

        Ok(onboarding_url)
    }

    /// Renova o link de onboarding de uma subconta já criada.
    pub async fn refresh_onboarding(
        &self,
        restaurant_id: Uuid,
        owner_id: Uuid,
    ) -> Result<String, AppError> {
        let restaurant = self
            .restaurants
            .find_by_id_and_owner(restaurant_id, owner_id)
            .await?
            .ok_or(AppError::RestaurantNotFound)?;

        let account_id = restaurant
            .stripe_account_id
            .ok_or(AppError::AccountNotCreated)?;

        self.issue_onboarding_link(restaurant_id, &account_id).await
    }

    /// Retrato ao vivo da subconta. O resultado não é gravado de volta na
    /// linha do restaurante.
    pub async fn get_status(
        &self,
        restaurant_id: Uuid,
        owner_id: Uuid,
    ) -> Result<AccountStatus, AppError> {
        let restaurant = self
            .restaurants
            .find_by_id_and_owner(restaurant_id, owner_id)
            .await?
            .ok_or(AppError::RestaurantNotFound)?;

        let Some(account_id) = restaurant.stripe_account_id else {
            return Ok(AccountStatus::NotStarted);
        };

        let account = self.processor.retrieve_account(&account_id).await?;

        Ok(AccountStatus::AccountCreated {
            charges_enabled: account.charges_enabled,
            payouts_enabled: account.payouts_enabled,
            requirements: account.requirements,
            account_id: account.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_doubles::{
        restaurant_fixture, FakeProcessor, InMemoryRestaurantStore,
    };

    fn service(
        restaurants: Arc<InMemoryRestaurantStore>,
        processor: Arc<FakeProcessor>,
    ) -> PaymentAccountService {
        PaymentAccountService::new(
            restaurants,
            processor,
            "http://localhost:3000".to_string(),
        )
    }

    #[tokio::test]
    async fn status_is_not_started_without_account() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let service = service(restaurants, Arc::new(FakeProcessor::new()));

        let status = service.get_status(restaurant_id, owner_id).await.unwrap();

        assert!(matches!(status, AccountStatus::NotStarted));
    }

    #[tokio::test]
    async fn owner_scoped_operations_hide_foreign_restaurants() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let other_user = Uuid::new_v4();
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let service = service(restaurants, Arc::new(FakeProcessor::new()));

        let create = service.create_account(restaurant_id, other_user).await;
        let status = service.get_status(restaurant_id, other_user).await;
        let refresh = service.refresh_onboarding(restaurant_id, other_user).await;

        assert!(matches!(create, Err(AppError::RestaurantNotFound)));
        assert!(matches!(status, Err(AppError::RestaurantNotFound)));
        assert!(matches!(refresh, Err(AppError::RestaurantNotFound)));
    }

    #[tokio::test]
    async fn create_account_persists_id_and_onboarding_link() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let processor = Arc::new(FakeProcessor::new());
        let service = service(restaurants.clone(), processor.clone());

        let (account_id, onboarding_url) =
            service.create_account(restaurant_id, owner_id).await.unwrap();

        let stored = restaurants.get(restaurant_id).unwrap();
        assert_eq!(stored.stripe_account_id.as_deref(), Some(account_id.as_str()));
        assert_eq!(stored.onboarding_link.as_deref(), Some(onboarding_url.as_str()));

        // URLs de refresh/return derivadas da base configurada + id do restaurante
        let links = processor.onboarding_links.lock().unwrap();
        let (_, refresh_url, return_url) = &links[0];
        assert_eq!(
            refresh_url,
            &format!("http://localhost:3000/restaurants/{restaurant_id}/stripe/refresh")
        );
        assert_eq!(
            return_url,
            &format!("http://localhost:3000/restaurants/{restaurant_id}/stripe/return")
        );
    }

    #[tokio::test]
    async fn empty_address_omits_support_address_entirely() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        // "Cafe Zero" sem nenhum campo de endereço preenchido
        let mut restaurant = restaurant_fixture(restaurant_id, owner_id);
        restaurant.address = Some(String::new());
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant]));
        let processor = Arc::new(FakeProcessor::new());
        let service = service(restaurants, processor.clone());

        service.create_account(restaurant_id, owner_id).await.unwrap();

        let created = processor.accounts_created.lock().unwrap();
        assert!(created[0].business_profile.support_address.is_none());
        assert_eq!(created[0].business_profile.name, "Cafe Zero");
    }

    #[tokio::test]
    async fn filled_address_carries_country_along() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let mut restaurant = restaurant_fixture(restaurant_id, owner_id);
        restaurant.address = Some("Bahnhofstrasse 1".to_string());
        restaurant.city = Some("Zürich".to_string());
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant]));
        let processor = Arc::new(FakeProcessor::new());
        let service = service(restaurants, processor.clone());

        service.create_account(restaurant_id, owner_id).await.unwrap();

        let created = processor.accounts_created.lock().unwrap();
        let address = created[0].business_profile.support_address.clone().unwrap();
        assert_eq!(address.line1.as_deref(), Some("Bahnhofstrasse 1"));
        assert_eq!(address.country.as_deref(), Some("CH"));
        assert!(address.state.is_none());
    }

    #[tokio::test]
    async fn processor_rejection_persists_nothing() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let processor = Arc::new(FakeProcessor::rejecting("Country not supported."));
        let service = service(restaurants.clone(), processor);

        let result = service.create_account(restaurant_id, owner_id).await;

        match result {
            Err(AppError::ProcessorRejected(message)) => {
                assert_eq!(message, "Country not supported.")
            }
            other => panic!("esperava ProcessorRejected, veio {other:?}"),
        }
        let stored = restaurants.get(restaurant_id).unwrap();
        assert!(stored.stripe_account_id.is_none());
        assert!(stored.onboarding_link.is_none());
    }

    #[tokio::test]
    async fn recreating_overwrites_stored_account_id() {
        // A recriação não é impedida: sobrescreve o id e deixa a subconta
        // anterior órfã.
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let service = service(restaurants.clone(), Arc::new(FakeProcessor::new()));

        let (first, _) = service.create_account(restaurant_id, owner_id).await.unwrap();
        let (second, _) = service.create_account(restaurant_id, owner_id).await.unwrap();

        assert_ne!(first, second);
        let stored = restaurants.get(restaurant_id).unwrap();
        assert_eq!(stored.stripe_account_id.as_deref(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn refresh_requires_created_account() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant_fixture(
            restaurant_id,
            owner_id,
        )]));
        let service = service(restaurants, Arc::new(FakeProcessor::new()));

        let result = service.refresh_onboarding(restaurant_id, owner_id).await;

        assert!(matches!(result, Err(AppError::AccountNotCreated)));
    }

    #[tokio::test]
    async fn status_reports_live_snapshot_without_persisting() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let mut restaurant = restaurant_fixture(restaurant_id, owner_id);
        restaurant.stripe_account_id = Some("acct_live_1".to_string());
        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant]));
        let processor = Arc::new(FakeProcessor::new());
        *processor.account_snapshot.lock().unwrap() = Some(crate::stripe::ProcessorAccount {
            id: "acct_live_1".to_string(),
            charges_enabled: true,
            payouts_enabled: true,
            requirements: serde_json::json!({ "currently_due": [] }),
        });
        let service = service(restaurants.clone(), processor);

        let status = service.get_status(restaurant_id, owner_id).await.unwrap();

        match status {
            AccountStatus::AccountCreated {
                charges_enabled,
                payouts_enabled,
                account_id,
                ..
            } => {
                assert!(charges_enabled);
                assert!(payouts_enabled);
                assert_eq!(account_id, "acct_live_1");
            }
            other => panic!("esperava AccountCreated, veio {other:?}"),
        }

        // O retrato ao vivo não atualiza os booleanos em cache
        let stored = restaurants.get(restaurant_id).unwrap();
        assert!(!stored.stripe_charges_enabled);
        assert!(!stored.stripe_payouts_enabled);
    }
}
