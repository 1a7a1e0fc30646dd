//! Response envelope and error mapping
//!
//! Every scoring endpoint answers with
//! `{ success, request_id, data, error: { code, message, field } }`.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use supplier_scoring::ScoringError;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub request_id: Uuid,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub field: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            request_id: Uuid::new_v4(),
            data: Some(data),
            error: None,
        })
    }
}

/// Failure of a scoring request, rendered as an error envelope
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

pub fn error_status(err: &ScoringError) -> StatusCode {
    match err {
        ScoringError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringError::Calculation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        Self {
            status: error_status(&err),
            body: ErrorBody {
                code: err.code(),
                message: err.to_string(),
                field: err.field().map(str::to_string),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                code: "invalid_request",
                message: rejection.body_text(),
                field: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4();
        if self.status.is_server_error() {
            tracing::error!("[{}] {}", request_id, self.body.message);
        } else {
            tracing::debug!("[{}] rejected: {}", request_id, self.body.message);
        }

        let envelope: ApiResponse<()> = ApiResponse {
            success: false,
            request_id,
            data: None,
            error: Some(self.body),
        };
        (self.status, Json(envelope)).into_response()
    }
}

/// JSON body extractor whose rejections use the error envelope
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ScoringJson<T>(pub T);
