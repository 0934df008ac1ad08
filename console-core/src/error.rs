use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures a console handler returns instead of a rendered page.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A path or form parameter could not be parsed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The session store could not be read or written
    #[error("Session error: {0}")]
    Session(String),
}

impl ConsoleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConsoleError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ConsoleError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status_code();
        let error = match &self {
            ConsoleError::BadRequest(msg) => msg.clone(),
            other @ ConsoleError::Session(_) => {
                tracing::error!(error = %other, "Console request failed");
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let response = ConsoleError::BadRequest("unknown role FOO".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "unknown role FOO");
    }

    #[tokio::test]
    async fn internal_errors_are_masked() {
        let response = ConsoleError::Session("store unavailable".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }
}
