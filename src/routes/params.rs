use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Locale;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub q: Option<String>,
    /// Only products with `stock` strictly below this value.
    pub low_stock: Option<i32>,
    pub limit: Option<u64>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
    pub locale: Option<Locale>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LocaleQuery {
    pub locale: Option<Locale>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QuoteListQuery {
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}
