// src/db.rs

pub mod store;
pub use store::{MenuTokenStore, ProductStore, RestaurantStore};

pub mod user_repo;
pub use user_repo::UserRepository;

pub mod restaurant_repo;
pub use restaurant_repo::RestaurantRepository;

pub mod product_repo;
pub use product_repo::ProductRepository;

pub mod menu_repo;
pub use menu_repo::MenuItemRepository;

pub mod menu_token_repo;
pub use menu_token_repo::MenuTokenRepository;
