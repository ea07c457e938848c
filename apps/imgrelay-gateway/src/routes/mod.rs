//! API routes

pub mod resolve;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{dto::resolve::ErrorResponse, handlers, AppState};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::resolve::resolve_handler,
        health_handler
    ),
    components(
        schemas(ErrorResponse)
    ),
    tags(
        (name = "resolve", description = "Path resolution endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "ImgRelay API",
        version = "0.1.0",
        description = "On-demand image transcoding proxy: resolves asset paths to WebP artifacts"
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", axum::routing::get(health_handler))
        .merge(resolve::routes())
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
