// src/common/test_doubles.rs
//
// Dublês em memória das lojas e do processador de pagamento, usados pelos
// testes dos serviços do núcleo.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{MenuTokenStore, ProductStore, RestaurantStore},
    models::{catalog::Product, menu::MenuToken, restaurant::Restaurant},
    stripe::{
        CheckoutSessionRequest, NewProcessorAccount, PaymentProcessor, ProcessorAccount,
    },
};

// ---
// Fixtures
// ---
pub fn restaurant_fixture(id: Uuid, owner_id: Uuid) -> Restaurant {
    let now = Utc::now();
    Restaurant {
        id,
        user_id: owner_id,
        name: "Cafe Zero".to_string(),
        email: "dono@cafezero.ch".to_string(),
        phone: None,
        address: None,
        city: None,
        state: None,
        postal_code: None,
        country: "CH".to_string(),
        stripe_account_id: None,
        stripe_charges_enabled: false,
        stripe_payouts_enabled: false,
        onboarding_link: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn product_fixture(id: Uuid) -> Product {
    Product {
        id,
        name: "Margherita Pizza".to_string(),
        description: Some("Classic tomato, mozzarella, basil".to_string()),
        price_cents: 1850,
        currency: "chf".to_string(),
        created_at: Utc::now(),
    }
}

// ---
// Lojas em memória
// ---
#[derive(Default)]
pub struct InMemoryRestaurantStore {
    pub rows: Mutex<HashMap<Uuid, Restaurant>>,
}

impl InMemoryRestaurantStore {
    pub fn with(restaurants: Vec<Restaurant>) -> Self {
        Self {
            rows: Mutex::new(restaurants.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Restaurant> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl RestaurantStore for InMemoryRestaurantStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, AppError> {
        Ok(self.get(id))
    }

    async fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Restaurant>, AppError> {
        Ok(self.get(id).filter(|r| r.user_id == owner_id))
    }

    async fn set_payment_account(&self, id: Uuid, account_id: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(restaurant) = rows.get_mut(&id) {
            restaurant.stripe_account_id = Some(account_id.to_string());
        }
        Ok(())
    }

    async fn set_onboarding_link(&self, id: Uuid, link: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(restaurant) = rows.get_mut(&id) {
            restaurant.onboarding_link = Some(link.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProductStore {
    pub rows: Mutex<HashMap<Uuid, Product>>,
}

impl InMemoryProductStore {
    pub fn with(products: Vec<Product>) -> Self {
        Self {
            rows: Mutex::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryMenuTokenStore {
    pub rows: Mutex<Vec<MenuToken>>,
}

#[async_trait]
impl MenuTokenStore for InMemoryMenuTokenStore {
    async fn find_by_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Option<MenuToken>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn find_by_token(&self, public_token: &str) -> Result<Option<MenuToken>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.public_token == public_token)
            .cloned())
    }

    async fn insert(
        &self,
        restaurant_id: Uuid,
        public_token: &str,
    ) -> Result<MenuToken, AppError> {
        let mut rows = self.rows.lock().unwrap();
        // Mesma semântica da restrição UNIQUE do banco
        if rows.iter().any(|t| t.public_token == public_token) {
            return Err(AppError::TokenCollision);
        }
        let token = MenuToken {
            id: Uuid::new_v4(),
            restaurant_id,
            public_token: public_token.to_string(),
            created_at: Utc::now(),
        };
        rows.push(token.clone());
        Ok(token)
    }

    async fn delete_by_restaurant(&self, restaurant_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.restaurant_id != restaurant_id);
        Ok((before - rows.len()) as u64)
    }
}

// ---
// Processador de pagamento falso
// ---
// Grava tudo o que recebe para as asserções e pode ser configurado para
// recusar qualquer chamada com uma mensagem.
#[derive(Default)]
pub struct FakeProcessor {
    pub accounts_created: Mutex<Vec<NewProcessorAccount>>,
    pub onboarding_links: Mutex<Vec<(String, String, String)>>,
    pub checkout_sessions: Mutex<Vec<(String, CheckoutSessionRequest)>>,
    pub account_snapshot: Mutex<Option<ProcessorAccount>>,
    pub rejection: Mutex<Option<String>>,
    counter: AtomicUsize,
}

impl FakeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            rejection: Mutex::new(Some(message.to_string())),
            ..Self::default()
        }
    }

    fn check_rejection(&self) -> Result<(), AppError> {
        if let Some(message) = self.rejection.lock().unwrap().clone() {
            return Err(AppError::ProcessorRejected(message));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProcessor for FakeProcessor {
    async fn create_account(&self, account: &NewProcessorAccount) -> Result<String, AppError> {
        self.check_rejection()?;
        self.accounts_created.lock().unwrap().push(account.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("acct_test_{n}"))
    }

    async fn retrieve_account(&self, account_id: &str) -> Result<ProcessorAccount, AppError> {
        self.check_rejection()?;
        Ok(self
            .account_snapshot
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| ProcessorAccount {
                id: account_id.to_string(),
                charges_enabled: false,
                payouts_enabled: false,
                requirements: json!({ "currently_due": [] }),
            }))
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<String, AppError> {
        self.check_rejection()?;
        self.onboarding_links.lock().unwrap().push((
            account_id.to_string(),
            refresh_url.to_string(),
            return_url.to_string(),
        ));
        Ok(format!("https://connect.stripe.test/setup/{account_id}"))
    }

    async fn create_checkout_session(
        &self,
        account_id: &str,
        session: &CheckoutSessionRequest,
    ) -> Result<String, AppError> {
        self.check_rejection()?;
        self.checkout_sessions
            .lock()
            .unwrap()
            .push((account_id.to_string(), session.clone()));
        Ok("https://checkout.stripe.test/c/pay/cs_test_1".to_string())
    }
}
