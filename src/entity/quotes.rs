use sea_orm::entity::prelude::*;

use crate::models::QuoteStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub product_name: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub quantity: Option<f64>,
    pub status: QuoteStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
