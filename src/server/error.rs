//! Mapping from store outcomes to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repo::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// No todo with this id; the raw path segment is echoed back.
    TodoNotFound(String),
    RouteNotFound,
    BadRequest(String),
    Store(StoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TodoNotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::TodoNotFound(id.to_string()),
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::TodoNotFound(id) => {
                (status, format!("TODO item with id {id} not found")).into_response()
            }
            Self::RouteNotFound => (
                status,
                Json(ErrorBody {
                    error: "Route not found".to_string(),
                }),
            )
                .into_response(),
            Self::BadRequest(error) => (status, Json(ErrorBody { error })).into_response(),
            Self::Store(err) => {
                let cause = std::error::Error::source(&err).map(ToString::to_string);
                tracing::error!(
                    error = %err,
                    cause = cause.as_deref().unwrap_or("-"),
                    "todo store failure"
                );
                (
                    status,
                    Json(ErrorBody {
                        error: err.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
