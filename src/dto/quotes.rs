use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Quote;

/// Public quote request. Any `status` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5))]
    pub phone: String,
    pub company: Option<String>,
    #[validate(length(min = 10))]
    pub message: String,
    pub product_name: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: Option<f64>,
}

impl CreateQuoteRequest {
    /// Trims text fields and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: blank_to_none(self.company),
            message: self.message.trim().to_string(),
            product_name: blank_to_none(self.product_name),
            quantity: self.quantity,
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuoteStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct QuoteList {
    #[schema(value_type = Vec<Quote>)]
    pub items: Vec<Quote>,
}
