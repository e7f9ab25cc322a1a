use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Quote;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_quotes: u64,
    pub pending_quotes: u64,
    pub total_products: u64,
    pub low_stock_products: Vec<LowStockProduct>,
    pub recent_quotes: Vec<Quote>,
}
