pub mod auth;
pub mod dashboard;
pub mod products;
pub mod quotes;
pub mod upload;
