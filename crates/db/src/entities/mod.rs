//! `SeaORM` entity definitions.

pub mod conversion_rates;
pub mod currencies;
pub mod users;
