//! DTOs for resolution endpoints

use serde::Serialize;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Upstream fetch failed: GET https://origin/img/a.jpg returned status 404")]
    pub error: String,
}
