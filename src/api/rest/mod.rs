//! REST API module for HTTP endpoints
//!
//! - `GET /api/hub/stats` - Active connections and hub counters

pub mod stats;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::HubError;

/// Error body returned by REST endpoints
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<HubError> for ApiError {
    fn from(e: HubError) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: e.to_string(),
        }
    }
}
