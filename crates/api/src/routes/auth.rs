//! Authentication routes for register and login.

use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::rate_limit::login_rate_limit_middleware};
use cambio_core::auth::{hash_password, verify_password};
use cambio_core::validation::validate_registration;
use cambio_db::UserRepository;
use cambio_db::repositories::UserError;
use cambio_shared::auth::{LoginRequest, LoginResponse, RegisterRequest};

/// Creates the auth router. Login carries the per-client throttle.
#[allow(clippy::needless_pass_by_value)]
pub fn routes(state: AppState) -> Router<AppState> {
    let login_route = Router::new()
        .route("/auth/login", post(login))
        .layer(middleware::from_fn_with_state(
            state,
            login_rate_limit_middleware,
        ));

    Router::new()
        .route("/auth/register", post(register))
        .merge(login_route)
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    // Validate inputs before touching any state
    if let Err(e) = validate_registration(&payload.username, &payload.password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    // Check if username already exists
    match user_repo.username_exists(&payload.username).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "username_exists",
                    "message": "An account with this username already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking username");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    // Create user; a racing duplicate surfaces as UsernameTaken here
    match user_repo.create(&payload.username, &password_hash).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "New user registered");
            (
                StatusCode::CREATED,
                Json(json!({ "message": "User registered successfully" })),
            )
                .into_response()
        }
        Err(UserError::UsernameTaken) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "username_exists",
                "message": "An account with this username already exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response()
        }
    }
}

/// POST /auth/login - Authenticate user and return a token.
///
/// Unknown usernames and wrong passwords produce the identical response so
/// callers cannot enumerate accounts.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    let token = match state.jwt_service.generate_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    (StatusCode::OK, Json(LoginResponse { token })).into_response()
}

/// The shared 401 body for unknown users and wrong passwords.
fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
        })),
    )
        .into_response()
}
