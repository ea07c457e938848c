//! Resolution handler

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect},
    Json,
};
use tracing::{error, info};

use imgrelay_domain::resolution::error::ResolutionError;

use crate::{dto::resolve::ErrorResponse, AppState};

/// Resolve any request path to its destination URL and redirect
///
/// Catch-all handler: every path under the service's origin is a candidate
/// request path.
#[utoipa::path(
    get,
    path = "/{path}",
    params(
        ("path" = String, Path, description = "Request path of the asset to resolve")
    ),
    responses(
        (status = 307, description = "Redirect to the resolved destination URL"),
        (status = 422, description = "Source bytes could not be transcoded", body = ErrorResponse),
        (status = 500, description = "Artifact store write failed", body = ErrorResponse),
        (status = 502, description = "Upstream fetch failed", body = ErrorResponse),
        (status = 504, description = "Upstream fetch timed out", body = ErrorResponse)
    ),
    tag = "resolve"
)]
pub async fn resolve_handler(State(state): State<AppState>, uri: Uri) -> impl IntoResponse {
    let path = uri.path();

    match state.resolver.resolve(path).await {
        Ok(destination) => {
            info!(path = %path, destination = %destination, "Resolved request path");
            Redirect::temporary(&destination).into_response()
        }
        Err(err) => {
            error!(path = %path, error = %err, "Failed to resolve request path");
            let status = match &err {
                ResolutionError::Fetch(_) => StatusCode::BAD_GATEWAY,
                ResolutionError::FetchTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ResolutionError::Transcode(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ResolutionError::StoreProbe(_)
                | ResolutionError::StoreWrite(_)
                | ResolutionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };

            (
                status,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
