//! Resolution routes

use axum::{routing::get, Router};

use crate::{handlers::resolve::resolve_handler, AppState};

/// Create resolution routes
///
/// Resolution is the fallback: any path not claimed by another route is a
/// candidate request path.
pub fn routes() -> Router<AppState> {
    Router::new().fallback(get(resolve_handler))
}
