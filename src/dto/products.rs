use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    gallery::MoveDirection,
    models::{LocalizedText, Product},
};

/// Full product payload. `PUT` replaces every field, `images` included.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[validate(length(min = 1))]
    pub name_en: String,
    #[validate(length(min = 1))]
    pub name_fr: String,
    #[validate(length(min = 1))]
    pub description_en: String,
    #[validate(length(min = 1))]
    pub description_fr: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductRequest {
    pub fn trimmed(mut self) -> Self {
        self.name_en = self.name_en.trim().to_string();
        self.name_fr = self.name_fr.trim().to_string();
        self.description_en = self.description_en.trim().to_string();
        self.description_fr = self.description_fr.trim().to_string();
        self.category = self.category.trim().to_string();
        self
    }

    pub fn name(&self) -> LocalizedText {
        LocalizedText::new(&self.name_en, &self.name_fr)
    }

    pub fn description(&self) -> LocalizedText {
        LocalizedText::new(&self.description_en, &self.description_fr)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddImageRequest {
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveImageRequest {
    pub direction: MoveDirection,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
