//! Currency catalog and conversion routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use cambio_core::currency::convert_amount;
use cambio_core::validation::{normalize_code, validate_amount, validate_currency};
use cambio_db::entities::{conversion_rates, currencies};
use cambio_db::repositories::{
    ConversionRateError, ConversionRateRepository, CurrencyError, CurrencyRepository, RateUpsert,
    UpsertRateInput,
};

/// Creates the public currency routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/currency/convert", post(convert))
        .route("/currency/currencies", get(list_currencies))
}

/// Creates the mutation routes (requires auth middleware to be applied
/// externally).
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/currency/add-currency", post(add_currency))
        .route("/currency/add-rate", post(add_rate))
        .route("/currency/delete/{code}", delete(delete_currency))
}

/// Request body for creating a currency.
#[derive(Debug, Deserialize)]
pub struct AddCurrencyRequest {
    /// Currency code (3 characters, normalized to uppercase).
    pub code: String,
    /// Display name (at least 3 characters).
    pub name: String,
}

/// Request body for creating/updating a conversion rate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRateRequest {
    /// Base currency code.
    pub base_code: String,
    /// Target currency code.
    pub target_code: String,
    /// Conversion rate (base * rate = target).
    pub rate: f64,
}

/// Request body for a conversion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Base currency code.
    pub base_code: String,
    /// Target currency code.
    pub target_code: String,
    /// Amount in the base currency.
    pub amount: f64,
}

/// Response for a currency.
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    /// Currency ID.
    pub id: i32,
    /// Currency code.
    pub code: String,
    /// Display name.
    pub name: String,
}

impl From<currencies::Model> for CurrencyResponse {
    fn from(model: currencies::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
        }
    }
}

/// Response for a stored conversion rate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    /// Rate row ID.
    pub id: i32,
    /// Base currency ID.
    pub base_currency_id: i32,
    /// Target currency ID.
    pub target_currency_id: i32,
    /// Conversion rate.
    pub rate: f64,
}

impl From<conversion_rates::Model> for RateResponse {
    fn from(model: conversion_rates::Model) -> Self {
        Self {
            id: model.id,
            base_currency_id: model.base_currency_id,
            target_currency_id: model.target_currency_id,
            rate: model.rate,
        }
    }
}

/// Response for a conversion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Amount in the target currency.
    pub converted_amount: f64,
}

/// POST /currency/add-currency - Add a new currency.
async fn add_currency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<AddCurrencyRequest>,
) -> impl IntoResponse {
    let code = match validate_currency(&payload.code, &payload.name) {
        Ok(code) => code,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let currency_repo = CurrencyRepository::new((*state.db).clone());

    match currency_repo.create(&code, &payload.name).await {
        Ok(currency) => {
            info!(code = %currency.code, "Currency added");
            (StatusCode::CREATED, Json(CurrencyResponse::from(currency))).into_response()
        }
        Err(CurrencyError::DuplicateCode) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_code",
                "message": "Currency code already exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to add currency");
            internal_error()
        }
    }
}

/// POST /currency/add-rate - Create or update a conversion rate.
async fn add_rate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<AddRateRequest>,
) -> impl IntoResponse {
    let (base_code, target_code) =
        match (normalize_code(&payload.base_code), normalize_code(&payload.target_code)) {
            (Ok(base), Ok(target)) => (base, target),
            (Err(e), _) | (_, Err(e)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "validation_error",
                        "message": e.to_string()
                    })),
                )
                    .into_response();
            }
        };

    let rate_repo = ConversionRateRepository::new((*state.db).clone());

    let input = UpsertRateInput {
        base_code,
        target_code,
        rate: payload.rate,
    };

    match rate_repo.upsert_rate(input).await {
        Ok(RateUpsert::Created(rate)) => {
            info!(
                base_currency_id = %rate.base_currency_id,
                target_currency_id = %rate.target_currency_id,
                rate = %rate.rate,
                "Conversion rate created"
            );
            (StatusCode::CREATED, Json(RateResponse::from(rate))).into_response()
        }
        Ok(RateUpsert::Updated(rate)) => {
            info!(
                base_currency_id = %rate.base_currency_id,
                target_currency_id = %rate.target_currency_id,
                rate = %rate.rate,
                "Conversion rate updated"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Conversion rate updated",
                    "rate": RateResponse::from(rate)
                })),
            )
                .into_response()
        }
        Err(ConversionRateError::NonPositiveRate) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_rate",
                "message": "Conversion rate must be a positive number"
            })),
        )
            .into_response(),
        Err(ConversionRateError::CurrencyNotFound(code)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "currency_not_found",
                "message": format!("Currency '{code}' not found")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to add conversion rate");
            internal_error()
        }
    }
}

/// POST /currency/convert - Convert an amount between currencies.
async fn convert(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> impl IntoResponse {
    let (base_code, target_code) =
        match (normalize_code(&payload.base_code), normalize_code(&payload.target_code)) {
            (Ok(base), Ok(target)) => (base, target),
            (Err(e), _) | (_, Err(e)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "validation_error",
                        "message": e.to_string()
                    })),
                )
                    .into_response();
            }
        };

    if let Err(e) = validate_amount(payload.amount) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let rate_repo = ConversionRateRepository::new((*state.db).clone());

    match rate_repo.find_rate(&base_code, &target_code).await {
        Ok(rate) => {
            let converted_amount = convert_amount(payload.amount, rate.rate);
            (StatusCode::OK, Json(ConvertResponse { converted_amount })).into_response()
        }
        Err(ConversionRateError::CurrencyNotFound(code)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "currency_not_found",
                "message": format!("Currency '{code}' not found")
            })),
        )
            .into_response(),
        Err(e @ ConversionRateError::RateNotFound(_, _)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "rate_not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to convert currency");
            internal_error()
        }
    }
}

/// GET /currency/currencies - List all currencies.
async fn list_currencies(State(state): State<AppState>) -> impl IntoResponse {
    let currency_repo = CurrencyRepository::new((*state.db).clone());

    match currency_repo.list().await {
        Ok(currencies) => {
            let response: Vec<CurrencyResponse> =
                currencies.into_iter().map(CurrencyResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list currencies");
            internal_error()
        }
    }
}

/// DELETE /currency/delete/{code} - Delete a currency.
///
/// The path parameter is matched as-is; dependent rate rows are left in
/// place (see DESIGN.md).
async fn delete_currency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let currency_repo = CurrencyRepository::new((*state.db).clone());

    match currency_repo.delete_by_code(&code).await {
        Ok(()) => {
            info!(code = %code, "Currency deleted");
            (
                StatusCode::OK,
                Json(json!({
                    "message": format!("Currency '{code}' deleted successfully")
                })),
            )
                .into_response()
        }
        Err(CurrencyError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "currency_not_found",
                "message": "Currency not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to delete currency");
            internal_error()
        }
    }
}

/// The shared 500 body for unexpected storage failures.
fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
