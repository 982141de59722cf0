//! Typed input validators for the catalog and auth endpoints.
//!
//! Field rules match the service contract: usernames and passwords at least
//! 5 characters, currency codes exactly 3 characters normalized to
//! uppercase, currency names at least 3 characters, amounts strictly
//! positive.

use thiserror::Error;

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 5;
/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 5;
/// Required currency code length in characters.
pub const CODE_LEN: usize = 3;
/// Minimum currency name length in characters.
pub const MIN_NAME_LEN: usize = 3;

/// Input validation errors, reported to the caller and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Username shorter than the minimum.
    #[error("username must be at least {MIN_USERNAME_LEN} characters")]
    UsernameTooShort,

    /// Password shorter than the minimum.
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    /// Currency code is not exactly three characters.
    #[error("currency code must be exactly {CODE_LEN} characters")]
    BadCodeLength,

    /// Currency name shorter than the minimum.
    #[error("currency name must be at least {MIN_NAME_LEN} characters")]
    NameTooShort,

    /// Amount must be a positive number.
    #[error("amount must be a positive number")]
    NonPositiveAmount,
}

/// Validates registration input.
///
/// # Errors
///
/// Returns a `ValidationError` if the username or password is below the
/// minimum length. No partial state is changed on failure.
pub fn validate_registration(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Validates a currency code and normalizes it to uppercase.
///
/// # Errors
///
/// Returns `ValidationError::BadCodeLength` unless the code is exactly
/// three characters.
pub fn normalize_code(code: &str) -> Result<String, ValidationError> {
    if code.chars().count() != CODE_LEN {
        return Err(ValidationError::BadCodeLength);
    }
    Ok(code.to_uppercase())
}

/// Validates currency creation input, returning the normalized code.
///
/// # Errors
///
/// Returns a `ValidationError` if the code is not exactly three characters
/// or the name is below the minimum length.
pub fn validate_currency(code: &str, name: &str) -> Result<String, ValidationError> {
    let code = normalize_code(code)?;
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    Ok(code)
}

/// Validates that an amount is a positive, finite number.
///
/// # Errors
///
/// Returns `ValidationError::NonPositiveAmount` for zero, negative, NaN, or
/// infinite amounts.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice", "secret", Ok(()))]
    #[case("bob", "secret", Err(ValidationError::UsernameTooShort))]
    #[case("ab", "pw1234", Err(ValidationError::UsernameTooShort))]
    #[case("alice", "pw", Err(ValidationError::PasswordTooShort))]
    // Username is checked first when both fields are short.
    #[case("ab", "pw", Err(ValidationError::UsernameTooShort))]
    fn test_validate_registration(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Result<(), ValidationError>,
    ) {
        assert_eq!(validate_registration(username, password), expected);
    }

    #[rstest]
    #[case("usd", Ok("USD".to_string()))]
    #[case("EUR", Ok("EUR".to_string()))]
    #[case("us", Err(ValidationError::BadCodeLength))]
    #[case("usdx", Err(ValidationError::BadCodeLength))]
    #[case("", Err(ValidationError::BadCodeLength))]
    fn test_normalize_code(#[case] code: &str, #[case] expected: Result<String, ValidationError>) {
        assert_eq!(normalize_code(code), expected);
    }

    #[test]
    fn test_validate_currency_checks_name() {
        assert_eq!(validate_currency("usd", "US Dollar"), Ok("USD".to_string()));
        assert_eq!(
            validate_currency("usd", "US"),
            Err(ValidationError::NameTooShort)
        );
    }

    #[test]
    fn test_validate_amount_edge_cases() {
        assert!(validate_amount(0.01).is_ok());
        assert_eq!(validate_amount(0.0), Err(ValidationError::NonPositiveAmount));
        assert_eq!(
            validate_amount(-10.0),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_amount(f64::NAN),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_amount(f64::INFINITY),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    proptest! {
        /// Any three-character code normalizes to its uppercase form; any
        /// other length is rejected.
        #[test]
        fn prop_code_normalization(code in "[a-zA-Z]{0,6}") {
            let result = normalize_code(&code);
            if code.chars().count() == CODE_LEN {
                prop_assert_eq!(result, Ok(code.to_uppercase()));
            } else {
                prop_assert_eq!(result, Err(ValidationError::BadCodeLength));
            }
        }

        /// Registration validation depends only on character counts.
        #[test]
        fn prop_registration_length_rule(
            username in "[a-z]{1,10}",
            password in "[a-z0-9]{1,10}",
        ) {
            let result = validate_registration(&username, &password);
            if username.chars().count() < MIN_USERNAME_LEN {
                prop_assert_eq!(result, Err(ValidationError::UsernameTooShort));
            } else if password.chars().count() < MIN_PASSWORD_LEN {
                prop_assert_eq!(result, Err(ValidationError::PasswordTooShort));
            } else {
                prop_assert_eq!(result, Ok(()));
            }
        }
    }
}
