//! `SeaORM` Entity for the conversion_rates table.
//!
//! A row is a directed edge (base -> target); the reverse direction is a
//! separate, independently stored record. Currency references are weak:
//! rows are looked up by id explicitly and survive deletion of the
//! currency they point at.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversion_rates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub base_currency_id: i32,
    pub target_currency_id: i32,
    pub rate: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::BaseCurrencyId",
        to = "super::currencies::Column::Id"
    )]
    BaseCurrency,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::TargetCurrencyId",
        to = "super::currencies::Column::Id"
    )]
    TargetCurrency,
}

impl ActiveModelBehavior for ActiveModel {}
