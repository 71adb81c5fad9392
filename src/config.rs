// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        store::{MenuTokenStore, ProductStore, RestaurantStore},
        MenuItemRepository, MenuTokenRepository, ProductRepository, RestaurantRepository,
        UserRepository,
    },
    services::{AuthService, CheckoutService, MenuTokenService, PaymentAccountService},
    stripe::{PaymentProcessor, StripeClient},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    // Base de todas as URLs de redirecionamento/callback
    pub redirect_base_url: String,

    pub auth_service: AuthService,
    pub payment_account_service: PaymentAccountService,
    pub checkout_service: CheckoutService,
    pub menu_token_service: MenuTokenService,

    pub restaurant_repo: RestaurantRepository,
    pub product_repo: ProductRepository,
    pub menu_item_repo: MenuItemRepository,
    pub menu_tokens: Arc<dyn MenuTokenStore>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Configuração obrigatória falha aqui, na subida, nunca por requisição.
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let stripe_secret_key =
            env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY deve ser definida");
        let redirect_base_url =
            env::var("REDIRECT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let restaurant_repo = RestaurantRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let menu_item_repo = MenuItemRepository::new(db_pool.clone());
        let menu_token_repo = MenuTokenRepository::new(db_pool.clone());

        // Os serviços do núcleo recebem as lojas pelas interfaces, o que
        // permite dublês nos testes.
        let restaurants: Arc<dyn RestaurantStore> = Arc::new(restaurant_repo.clone());
        let products: Arc<dyn ProductStore> = Arc::new(product_repo.clone());
        let menu_tokens: Arc<dyn MenuTokenStore> = Arc::new(menu_token_repo);
        let processor: Arc<dyn PaymentProcessor> = Arc::new(StripeClient::new(stripe_secret_key));

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let payment_account_service = PaymentAccountService::new(
            restaurants.clone(),
            processor.clone(),
            redirect_base_url.clone(),
        );
        let checkout_service = CheckoutService::new(
            restaurants.clone(),
            products,
            processor,
            redirect_base_url.clone(),
        );
        let menu_token_service = MenuTokenService::new(restaurants, menu_tokens.clone());

        Ok(Self {
            db_pool,
            redirect_base_url,
            auth_service,
            payment_account_service,
            checkout_service,
            menu_token_service,
            restaurant_repo,
            product_repo,
            menu_item_repo,
            menu_tokens,
        })
    }
}
