//! Currency conversion arithmetic.

pub mod conversion;

pub use conversion::convert_amount;
