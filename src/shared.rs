use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::hub::{HubError, HubHandle};

/// Shared application state handed to every HTTP handler
#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
    pub session_config: SessionConfig,
}

impl AppState {
    pub fn new(hub: HubHandle, session_config: SessionConfig) -> Self {
        Self {
            hub,
            session_config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Hub unavailable: {0}")]
    HubUnavailable(#[from] HubError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::HubUnavailable(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
