// src/services/checkout_service.rs
//
// Montagem das sessões de checkout contra a subconta do restaurante. A sessão
// é efêmera: o único rastro durável fica no processador.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{ProductStore, RestaurantStore},
    models::payment::PublicCheckoutItem,
    stripe::{CheckoutSessionRequest, LineItem, PaymentProcessor},
};

// Moeda fixa do fluxo público, como no cardápio hospedado
const PUBLIC_CHECKOUT_CURRENCY: &str = "chf";

#[derive(Clone)]
pub struct CheckoutService {
    restaurants: Arc<dyn RestaurantStore>,
    products: Arc<dyn ProductStore>,
    processor: Arc<dyn PaymentProcessor>,
    redirect_base_url: String,
}

impl CheckoutService {
    pub fn new(
        restaurants: Arc<dyn RestaurantStore>,
        products: Arc<dyn ProductStore>,
        processor: Arc<dyn PaymentProcessor>,
        redirect_base_url: String,
    ) -> Self {
        Self {
            restaurants,
            products,
            processor,
            redirect_base_url,
        }
    }

    fn success_url(&self) -> String {
        format!(
            "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.redirect_base_url
        )
    }

    /// Checkout do dono autenticado para um produto do catálogo, quantidade
    /// fixa em um.
    pub async fn create_authenticated_checkout(
        &self,
        product_id: Uuid,
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
            .ok_or(AppError::AccountNotConnected)?;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let session = CheckoutSessionRequest {
            line_items: vec![LineItem {
                name: product.name.clone(),
                description: product.description.clone(),
                currency: product.currency.clone(),
                unit_amount: product.price_cents,
                quantity: 1,
            }],
            success_url: self.success_url(),
            cancel_url: format!("{}/checkout/cancel", self.redirect_base_url),
            // Identificadores para reconciliação externa; só escrevemos aqui.
            metadata: vec![
                ("restaurant_id".to_string(), restaurant.id.to_string()),
                ("product_id".to_string(), product.id.to_string()),
                ("user_id".to_string(), owner_id.to_string()),
            ],
        };

        self.processor
            .create_checkout_session(&account_id, &session)
            .await
    }

    /// Checkout público do cardápio, sem autenticação. Os itens vêm do
    /// cliente final e os preços são repassados como vieram, sem conferir com
    /// os itens armazenados do cardápio; as capacidades da subconta também
    /// não são conferidas — o processador é o ponto real de barragem. Os dois
    /// comportamentos estão registrados em DESIGN.md.
    pub async fn create_public_checkout(
        &self,
        restaurant_id: Uuid,
        items: &[PublicCheckoutItem],
    ) -> Result<String, AppError> {
        if items.is_empty() {
            return Err(AppError::MissingFields("items"));
        }

        let restaurant = self
            .restaurants
            .find_by_id(restaurant_id)
            .await?
            .ok_or(AppError::RestaurantNotFound)?;

        let account_id = restaurant
            .stripe_account_id
            .ok_or(AppError::AccountNotConnected)?;

        let line_items = items
            .iter()
            .map(|item| LineItem {
                name: item.name.clone(),
                description: None,
                currency: PUBLIC_CHECKOUT_CURRENCY.to_string(),
                unit_amount: item.unit_price,
                quantity: item.quantity,
            })
            .collect();

        let session = CheckoutSessionRequest {
            line_items,
            success_url: self.success_url(),
            cancel_url: format!("{}/public/menu/{}", self.redirect_base_url, restaurant.id),
            metadata: vec![("restaurant_id".to_string(), restaurant.id.to_string())],
        };

        self.processor
            .create_checkout_session(&account_id, &session)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_doubles::{
        product_fixture, restaurant_fixture, FakeProcessor, InMemoryProductStore,
        InMemoryRestaurantStore,
    };

    struct Setup {
        service: CheckoutService,
        processor: Arc<FakeProcessor>,
        restaurant_id: Uuid,
        owner_id: Uuid,
        product_id: Uuid,
    }

    fn setup(connected: bool) -> Setup {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut restaurant = restaurant_fixture(restaurant_id, owner_id);
        if connected {
            restaurant.stripe_account_id = Some("acct_test_77".to_string());
        }

        let restaurants = Arc::new(InMemoryRestaurantStore::with(vec![restaurant]));
        let products = Arc::new(InMemoryProductStore::with(vec![product_fixture(product_id)]));
        let processor = Arc::new(FakeProcessor::new());

        let service = CheckoutService::new(
            restaurants,
            products,
            processor.clone(),
            "http://localhost:3000".to_string(),
        );

        Setup {
            service,
            processor,
            restaurant_id,
            owner_id,
            product_id,
        }
    }

    #[tokio::test]
    async fn authenticated_checkout_requires_connected_account() {
        let s = setup(false);

        let result = s
            .service
            .create_authenticated_checkout(s.product_id, s.restaurant_id, s.owner_id)
            .await;

        assert!(matches!(result, Err(AppError::AccountNotConnected)));
    }

    #[tokio::test]
    async fn authenticated_checkout_is_owner_scoped() {
        let s = setup(true);

        let result = s
            .service
            .create_authenticated_checkout(s.product_id, s.restaurant_id, Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::RestaurantNotFound)));
    }

    #[tokio::test]
    async fn authenticated_checkout_requires_known_product() {
        let s = setup(true);

        let result = s
            .service
            .create_authenticated_checkout(Uuid::new_v4(), s.restaurant_id, s.owner_id)
            .await;

        assert!(matches!(result, Err(AppError::ProductNotFound)));
    }

    #[tokio::test]
    async fn authenticated_checkout_builds_single_catalog_line_item() {
        let s = setup(true);

        let url = s
            .service
            .create_authenticated_checkout(s.product_id, s.restaurant_id, s.owner_id)
            .await
            .unwrap();

        assert!(url.starts_with("https://checkout.stripe.test/"));

        let sessions = s.processor.checkout_sessions.lock().unwrap();
        let (account_id, session) = &sessions[0];
        // A sessão é criada em nome da subconta do restaurante
        assert_eq!(account_id, "acct_test_77");
        assert_eq!(session.line_items.len(), 1);
        assert_eq!(session.line_items[0].name, "Margherita Pizza");
        assert_eq!(session.line_items[0].unit_amount, 1850);
        assert_eq!(session.line_items[0].quantity, 1);
        assert!(session
            .metadata
            .contains(&("restaurant_id".to_string(), s.restaurant_id.to_string())));
        assert!(session
            .metadata
            .contains(&("product_id".to_string(), s.product_id.to_string())));
        assert!(session
            .metadata
            .contains(&("user_id".to_string(), s.owner_id.to_string())));
    }

    #[tokio::test]
    async fn public_checkout_rejects_empty_items() {
        let s = setup(true);

        let result = s.service.create_public_checkout(s.restaurant_id, &[]).await;

        assert!(matches!(result, Err(AppError::MissingFields("items"))));
        assert!(s.processor.checkout_sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn public_checkout_requires_existing_restaurant() {
        let s = setup(true);
        let items = vec![PublicCheckoutItem {
            name: "Iced Latte".to_string(),
            unit_price: 650,
            quantity: 1,
        }];

        let result = s.service.create_public_checkout(Uuid::new_v4(), &items).await;

        assert!(matches!(result, Err(AppError::RestaurantNotFound)));
    }

    #[tokio::test]
    async fn public_checkout_passes_client_prices_through() {
        let s = setup(true);
        // Preço enviado pelo cliente, diferente de qualquer item armazenado
        let items = vec![
            PublicCheckoutItem {
                name: "Margherita Pizza".to_string(),
                unit_price: 1,
                quantity: 2,
            },
            PublicCheckoutItem {
                name: "Iced Latte".to_string(),
                unit_price: 650,
                quantity: 1,
            },
        ];

        s.service
            .create_public_checkout(s.restaurant_id, &items)
            .await
            .unwrap();

        let sessions = s.processor.checkout_sessions.lock().unwrap();
        let (_, session) = &sessions[0];
        assert_eq!(session.line_items[0].unit_amount, 1);
        assert_eq!(session.line_items[0].quantity, 2);
        assert_eq!(session.line_items[1].unit_amount, 650);
        // Só o restaurante vai na metadata do fluxo público
        assert_eq!(
            session.metadata,
            vec![("restaurant_id".to_string(), s.restaurant_id.to_string())]
        );
        assert_eq!(
            session.cancel_url,
            format!("http://localhost:3000/public/menu/{}", s.restaurant_id)
        );
    }

    #[tokio::test]
    async fn public_checkout_requires_connected_account() {
        let s = setup(false);
        let items = vec![PublicCheckoutItem {
            name: "Iced Latte".to_string(),
            unit_price: 650,
            quantity: 1,
        }];

        let result = s.service.create_public_checkout(s.restaurant_id, &items).await;

        assert!(matches!(result, Err(AppError::AccountNotConnected)));
    }

    #[tokio::test]
    async fn processor_rejection_passes_message_through() {
        let restaurant_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let mut restaurant = restaurant_fixture(restaurant_id, owner_id);
        restaurant.stripe_account_id = Some("acct_test_77".to_string());

        let service = CheckoutService::new(
            Arc::new(InMemoryRestaurantStore::with(vec![restaurant])),
            Arc::new(InMemoryProductStore::default()),
            Arc::new(FakeProcessor::rejecting("Charges disabled.")),
            "http://localhost:3000".to_string(),
        );
        let items = vec![PublicCheckoutItem {
            name: "Iced Latte".to_string(),
            unit_price: 650,
            quantity: 1,
        }];

        let result = service.create_public_checkout(restaurant_id, &items).await;

        match result {
            Err(AppError::ProcessorRejected(message)) => assert_eq!(message, "Charges disabled."),
            other => panic!("esperava ProcessorRejected, veio {other:?}"),
        }
    }
}
