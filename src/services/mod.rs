pub mod admin_service;
pub mod auth_service;
pub mod product_service;
pub mod quote_service;
pub mod upload_service;
