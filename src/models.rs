use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{products::Model as ProductModel, quotes::Model as QuoteModel};

/// Locales served by the public site. Only English and French carry their
/// own catalog text; the others read the English copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Es,
    Zh,
}

/// A catalog string kept in both catalog languages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LocalizedText {
    pub en: String,
    pub fr: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, fr: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            fr: fr.into(),
        }
    }

    pub fn resolve(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fr => &self.fr,
            Locale::En | Locale::Es | Locale::Zh => &self.en,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 4] = [
        QuoteStatus::Pending,
        QuoteStatus::Processing,
        QuoteStatus::Completed,
        QuoteStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Processing => "processing",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quote status `{}`", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for QuoteStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Product as exposed over the API. `name` and `description` are derived from
/// the localized pair for the requested locale.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub name_en: String,
    pub name_fr: String,
    pub description: String,
    pub description_en: String,
    pub description_fr: String,
    pub category: String,
    pub price: f64,
    pub images: Vec<String>,
    pub stock: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn from_entity(model: ProductModel, locale: Locale) -> Self {
        let name = LocalizedText::new(model.name_en, model.name_fr);
        let description = LocalizedText::new(model.description_en, model.description_fr);
        Self {
            id: model.id,
            name: name.resolve(locale).to_string(),
            description: description.resolve(locale).to_string(),
            name_en: name.en,
            name_fr: name.fr,
            description_en: description.en,
            description_fr: description.fr,
            category: model.category,
            price: model.price,
            images: model.images.0,
            stock: model.stock,
            featured: model.featured,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub message: String,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
}

impl From<QuoteModel> for Quote {
    fn from(model: QuoteModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            company: model.company,
            message: model.message,
            product_name: model.product_name,
            quantity: model.quantity,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!("processing".parse::<QuoteStatus>(), Ok(QuoteStatus::Processing));
        assert_eq!(" rejected ".parse::<QuoteStatus>(), Ok(QuoteStatus::Rejected));
        assert!("archived".parse::<QuoteStatus>().is_err());
        assert!("Pending".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn localized_text_falls_back_to_english() {
        let name = LocalizedText::new("Premium Tuna", "Thon Premium");
        assert_eq!(name.resolve(Locale::Fr), "Thon Premium");
        assert_eq!(name.resolve(Locale::Zh), "Premium Tuna");
    }
}
