// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod stripe;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas) + rota protegida /me
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // CRUD de restaurantes + ciclo de vida da subconta de pagamento
    let restaurant_routes = Router::new()
        .route(
            "/",
            post(handlers::restaurants::create_restaurant)
                .get(handlers::restaurants::list_restaurants),
        )
        .route(
            "/{id}",
            get(handlers::restaurants::get_restaurant)
                .put(handlers::restaurants::update_restaurant)
                .delete(handlers::restaurants::delete_restaurant),
        )
        .route(
            "/{id}/account/create",
            post(handlers::payments::create_payment_account),
        )
        .route(
            "/{id}/account/status",
            get(handlers::payments::get_account_status),
        )
        .route(
            "/{id}/account/refresh",
            get(handlers::payments::refresh_onboarding),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route("/", get(handlers::catalog::list_products))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O checkout do dono é protegido; o checkout público não tem autenticação
    let checkout_routes = Router::new()
        .route(
            "/authenticated",
            post(handlers::checkout::create_authenticated_checkout),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .merge(
            Router::new().route("/public", post(handlers::checkout::create_public_checkout)),
        );

    // Cardápio: gestão pelo dono (protegida) + visão pública por token
    let menu_routes = Router::new()
        .route(
            "/{restaurant_id}",
            get(handlers::menu::list_menu_items).post(handlers::menu::create_menu_item),
        )
        .route(
            "/{restaurant_id}/{item_id}",
            put(handlers::menu::update_menu_item).delete(handlers::menu::delete_menu_item),
        )
        .route(
            "/{restaurant_id}/token",
            post(handlers::menu::rotate_menu_token),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .merge(Router::new().route("/public/{token}", get(handlers::menu::get_public_menu)));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .nest("/restaurants", restaurant_routes)
        .nest("/products", product_routes)
        .nest("/checkout", checkout_routes)
        .nest("/menu", menu_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
