//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod currencies;
pub mod health;

/// Creates the API router with public and protected routes.
///
/// Mutation routes sit behind the auth middleware; conversion and listing
/// are public; login carries its own throttle.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(currencies::protected_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes(state))
        .merge(currencies::public_routes())
        .merge(protected_routes)
}
