//! Conversion rate repository for currency conversion database operations.
//!
//! Rates are directed: the row for (base, target) is distinct from the row
//! for (target, base), and lookups never fall back to the reverse pair.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::entities::{conversion_rates, currencies};

/// Error types for conversion rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ConversionRateError {
    /// Rate must be positive.
    #[error("Conversion rate must be a positive number")]
    NonPositiveRate,

    /// Currency not found.
    #[error("Currency '{0}' not found")]
    CurrencyNotFound(String),

    /// No direct rate stored for the ordered pair.
    #[error("No conversion rate found from '{0}' to '{1}'. Please add the conversion rate.")]
    RateNotFound(String, String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating a conversion rate.
#[derive(Debug, Clone)]
pub struct UpsertRateInput {
    /// Base currency code (validated and uppercased by the caller).
    pub base_code: String,
    /// Target currency code (validated and uppercased by the caller).
    pub target_code: String,
    /// Conversion rate (base * rate = target).
    pub rate: f64,
}

/// Result of an upsert, distinguishing insert from in-place update.
#[derive(Debug, Clone)]
pub enum RateUpsert {
    /// A new rate row was inserted.
    Created(conversion_rates::Model),
    /// The existing row for the ordered pair was overwritten.
    Updated(conversion_rates::Model),
}

impl RateUpsert {
    /// Returns the stored rate row.
    #[must_use]
    pub fn model(&self) -> &conversion_rates::Model {
        match self {
            Self::Created(m) | Self::Updated(m) => m,
        }
    }
}

/// Conversion rate repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ConversionRateRepository {
    db: DatabaseConnection,
}

impl ConversionRateRepository {
    /// Creates a new conversion rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates or updates the rate for an ordered currency pair.
    ///
    /// The write is a single `INSERT ... ON CONFLICT DO UPDATE` against the
    /// unique index on (base_currency_id, target_currency_id), so
    /// concurrent upserts racing on the same pair cannot produce duplicate
    /// rows. The created/updated distinction comes from a pre-read; under a
    /// race it can at worst misreport which side won, never the stored
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The rate is not a positive number
    /// - Either currency code does not resolve to a stored currency
    pub async fn upsert_rate(
        &self,
        input: UpsertRateInput,
    ) -> Result<RateUpsert, ConversionRateError> {
        if !validate_rate_positive(input.rate) {
            return Err(ConversionRateError::NonPositiveRate);
        }

        let base = self.resolve_currency(&input.base_code).await?;
        let target = self.resolve_currency(&input.target_code).await?;

        let existing = self.find_pair(base.id, target.id).await?;

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = conversion_rates::ActiveModel {
            base_currency_id: Set(base.id),
            target_currency_id: Set(target.id),
            rate: Set(input.rate),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = conversion_rates::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    conversion_rates::Column::BaseCurrencyId,
                    conversion_rates::Column::TargetCurrencyId,
                ])
                .update_columns([
                    conversion_rates::Column::Rate,
                    conversion_rates::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(if existing.is_some() {
            RateUpsert::Updated(saved)
        } else {
            RateUpsert::Created(saved)
        })
    }

    /// Finds the direct rate for an ordered currency pair.
    ///
    /// Only the (base, target) direction is consulted: no inverse fallback,
    /// no derivation through intermediate currencies.
    ///
    /// # Errors
    ///
    /// Returns `ConversionRateError::CurrencyNotFound` if either code is
    /// unknown and `ConversionRateError::RateNotFound` if no rate row
    /// exists for the pair.
    pub async fn find_rate(
        &self,
        base_code: &str,
        target_code: &str,
    ) -> Result<conversion_rates::Model, ConversionRateError> {
        let base = self.resolve_currency(base_code).await?;
        let target = self.resolve_currency(target_code).await?;

        self.find_pair(base.id, target.id)
            .await?
            .ok_or_else(|| {
                ConversionRateError::RateNotFound(base_code.to_string(), target_code.to_string())
            })
    }

    /// Resolves a currency code to its stored row.
    async fn resolve_currency(
        &self,
        code: &str,
    ) -> Result<currencies::Model, ConversionRateError> {
        currencies::Entity::find()
            .filter(currencies::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or_else(|| ConversionRateError::CurrencyNotFound(code.to_string()))
    }

    /// Finds the rate row for an ordered pair of currency ids.
    async fn find_pair(
        &self,
        base_id: i32,
        target_id: i32,
    ) -> Result<Option<conversion_rates::Model>, ConversionRateError> {
        conversion_rates::Entity::find()
            .filter(conversion_rates::Column::BaseCurrencyId.eq(base_id))
            .filter(conversion_rates::Column::TargetCurrencyId.eq(target_id))
            .one(&self.db)
            .await
            .map_err(ConversionRateError::Database)
    }
}

// ============================================================================
// Pure helpers for property testing
// ============================================================================

/// Validates that a conversion rate is a positive, finite number.
#[must_use]
pub fn validate_rate_positive(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Represents a stored conversion rate for testing.
#[derive(Debug, Clone)]
pub struct StoredRate {
    /// Base currency code.
    pub base_code: String,
    /// Target currency code.
    pub target_code: String,
    /// Conversion rate.
    pub rate: f64,
}

/// Simulates the upsert logic (pure function for testing).
///
/// Overwrites the rate in place when the ordered pair already exists,
/// appends a new record otherwise. Returns `true` if a record was created.
pub fn simulate_upsert(
    stored: &mut Vec<StoredRate>,
    base_code: &str,
    target_code: &str,
    rate: f64,
) -> bool {
    if let Some(existing) = stored
        .iter_mut()
        .find(|r| r.base_code == base_code && r.target_code == target_code)
    {
        existing.rate = rate;
        return false;
    }

    stored.push(StoredRate {
        base_code: base_code.to_string(),
        target_code: target_code.to_string(),
        rate,
    });
    true
}

/// Simulates the direct-only rate lookup (pure function for testing).
///
/// Consults only the (base, target) direction; a stored (target, base) row
/// is never used.
#[must_use]
pub fn simulate_direct_lookup(
    stored: &[StoredRate],
    base_code: &str,
    target_code: &str,
) -> Option<f64> {
    stored
        .iter()
        .find(|r| r.base_code == base_code && r.target_code == target_code)
        .map(|r| r.rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating valid currency codes
    fn currency_code_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "USD".to_string(),
            "EUR".to_string(),
            "GBP".to_string(),
            "JPY".to_string(),
            "CHF".to_string(),
            "CAD".to_string(),
        ])
    }

    /// Strategy for generating positive conversion rates
    fn rate_strategy() -> impl Strategy<Value = f64> {
        0.0001f64..10_000.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Upserting the same ordered pair twice leaves exactly one record,
        /// holding the second rate.
        #[test]
        fn prop_upsert_single_row_per_pair(
            base in currency_code_strategy(),
            target in currency_code_strategy(),
            r1 in rate_strategy(),
            r2 in rate_strategy(),
        ) {
            prop_assume!(base != target);

            let mut stored = Vec::new();
            let created_first = simulate_upsert(&mut stored, &base, &target, r1);
            let created_second = simulate_upsert(&mut stored, &base, &target, r2);

            prop_assert!(created_first);
            prop_assert!(!created_second);

            let matching: Vec<_> = stored
                .iter()
                .filter(|r| r.base_code == base && r.target_code == target)
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0].rate, r2);
        }

        /// The ordered pair is directional: storing (target, base) never
        /// satisfies a lookup for (base, target).
        #[test]
        fn prop_lookup_never_uses_reverse_pair(
            base in currency_code_strategy(),
            target in currency_code_strategy(),
            rate in rate_strategy(),
        ) {
            prop_assume!(base != target);

            let mut stored = Vec::new();
            simulate_upsert(&mut stored, &target, &base, rate);

            prop_assert_eq!(simulate_direct_lookup(&stored, &base, &target), None);
            prop_assert_eq!(simulate_direct_lookup(&stored, &target, &base), Some(rate));
        }

        /// Rates in both directions are independent records; upserting one
        /// leaves the other untouched.
        #[test]
        fn prop_directions_are_independent(
            base in currency_code_strategy(),
            target in currency_code_strategy(),
            forward in rate_strategy(),
            backward in rate_strategy(),
            replacement in rate_strategy(),
        ) {
            prop_assume!(base != target);

            let mut stored = Vec::new();
            simulate_upsert(&mut stored, &base, &target, forward);
            simulate_upsert(&mut stored, &target, &base, backward);
            simulate_upsert(&mut stored, &base, &target, replacement);

            prop_assert_eq!(stored.len(), 2);
            prop_assert_eq!(
                simulate_direct_lookup(&stored, &base, &target),
                Some(replacement)
            );
            prop_assert_eq!(
                simulate_direct_lookup(&stored, &target, &base),
                Some(backward)
            );
        }

        /// Positive finite rates pass validation; zero, negative, and
        /// non-finite rates fail.
        #[test]
        fn prop_rate_must_be_positive(rate in -10_000.0f64..10_000.0) {
            prop_assert_eq!(validate_rate_positive(rate), rate > 0.0);
        }
    }

    #[test]
    fn test_non_finite_rates_rejected() {
        assert!(!validate_rate_positive(f64::NAN));
        assert!(!validate_rate_positive(f64::INFINITY));
        assert!(!validate_rate_positive(f64::NEG_INFINITY));
    }

    #[test]
    fn test_usd_eur_scenario() {
        // Store USD -> EUR at 0.9; converting 100 USD yields 90 EUR, and
        // the reverse direction stays unset.
        let mut stored = Vec::new();
        simulate_upsert(&mut stored, "USD", "EUR", 0.9);

        let rate = simulate_direct_lookup(&stored, "USD", "EUR").unwrap();
        assert_eq!(100.0 * rate, 90.0);

        assert_eq!(simulate_direct_lookup(&stored, "EUR", "USD"), None);
    }
}
