// src/services.rs

pub mod auth;
pub use auth::AuthService;

pub mod payment_account_service;
pub use payment_account_service::PaymentAccountService;

pub mod menu_token_service;
pub use menu_token_service::MenuTokenService;

pub mod checkout_service;
pub use checkout_service::CheckoutService;
