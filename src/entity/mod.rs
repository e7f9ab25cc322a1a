pub mod admins;
pub mod audit_logs;
pub mod products;
pub mod quotes;

pub use admins::Entity as Admins;
pub use audit_logs::Entity as AuditLogs;
pub use products::Entity as Products;
pub use quotes::Entity as Quotes;
