// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Restaurants ---
        handlers::restaurants::create_restaurant,
        handlers::restaurants::list_restaurants,
        handlers::restaurants::get_restaurant,
        handlers::restaurants::update_restaurant,
        handlers::restaurants::delete_restaurant,

        // --- Payment Accounts ---
        handlers::payments::create_payment_account,
        handlers::payments::get_account_status,
        handlers::payments::refresh_onboarding,

        // --- Catalog ---
        handlers::catalog::list_products,

        // --- Checkout ---
        handlers::checkout::create_authenticated_checkout,
        handlers::checkout::create_public_checkout,

        // --- Menu ---
        handlers::menu::list_menu_items,
        handlers::menu::create_menu_item,
        handlers::menu::update_menu_item,
        handlers::menu::delete_menu_item,
        handlers::menu::rotate_menu_token,
        handlers::menu::get_public_menu,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            models::restaurant::Restaurant,
            models::restaurant::PublicRestaurant,
            models::restaurant::CreateRestaurantPayload,
            models::restaurant::UpdateRestaurantPayload,

            models::catalog::Product,

            models::menu::MenuItem,
            models::menu::MenuToken,
            models::menu::CreateMenuItemPayload,
            models::menu::UpdateMenuItemPayload,
            models::menu::OwnerMenuResponse,
            models::menu::PublicMenuResponse,
            models::menu::MenuTokenResponse,

            models::payment::AccountStatus,
            models::payment::AccountCreatedResponse,
            models::payment::OnboardingLinkResponse,
            models::payment::AuthenticatedCheckoutPayload,
            models::payment::PublicCheckoutItem,
            models::payment::PublicCheckoutPayload,
            models::payment::CheckoutResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registro e login de usuários"),
        (name = "Restaurants", description = "CRUD de restaurantes do dono"),
        (name = "Payment Accounts", description = "Ciclo de vida da subconta de pagamento"),
        (name = "Catalog", description = "Catálogo global de produtos"),
        (name = "Checkout", description = "Sessões de checkout hospedadas pelo processador"),
        (name = "Menu", description = "Cardápio do restaurante e visão pública por token"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
