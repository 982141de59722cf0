//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Entities are plain data records; relationships are
//! foreign-key fields resolved by explicit lookup.

pub mod conversion_rate;
pub mod currency;
pub mod user;

pub use conversion_rate::{
    ConversionRateError, ConversionRateRepository, RateUpsert, UpsertRateInput,
};
pub use currency::{CurrencyError, CurrencyRepository};
pub use user::{UserError, UserRepository};
