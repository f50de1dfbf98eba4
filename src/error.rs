use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::notify::NotifyError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing field, malformed phone number or unreadable body.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Notification delivery failed: {0}")]
    Notification(NotifyError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Configuration(_)
            | AppError::Notification(_)
            | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the `{success:false, message}` envelope. With `dev_mode` the
    /// raw error text is added under `error` for server-side failures.
    pub fn respond(self, dev_mode: bool) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                "Server configuration error".to_string()
            }
            AppError::Notification(err) => {
                tracing::error!("Notification error: {err}");
                match err {
                    NotifyError::Api { status, description } => {
                        let detail = description.clone().unwrap_or_else(|| status.to_string());
                        format!("Telegram error: {detail}")
                    }
                    NotifyError::Unreachable(_) => {
                        "Unable to reach the Telegram API".to_string()
                    }
                    NotifyError::NotConfigured => "Server configuration error".to_string(),
                }
            }
            AppError::Persistence(err) => {
                tracing::error!("Persistence error: {err}");
                "Internal server error, please try again".to_string()
            }
        };

        let mut body = json!({ "success": false, "message": message });
        if dev_mode && status.is_server_error() {
            body["error"] = json!(self.to_string());
        }

        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.respond(false)
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::NotConfigured => {
                AppError::Configuration("Telegram bot token or chat id is not set".to_string())
            }
            other => AppError::Notification(other),
        }
    }
}
