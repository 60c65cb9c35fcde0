use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pickdesk_models::DeskError;
use tracing::error;

use crate::routes::ApiResponse;

/// Desk failures rendered as the usual response envelope with
/// `success: false`.
#[derive(Debug)]
pub struct ApiError(pub DeskError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DeskError::NotFound { .. } => StatusCode::NOT_FOUND,
            DeskError::InvalidSport(_)
            | DeskError::UnparseableLine(_)
            | DeskError::Validation(_) => StatusCode::BAD_REQUEST,
            DeskError::AlreadyPublished { .. }
            | DeskError::NotPublished { .. }
            | DeskError::ReportLocked { .. }
            | DeskError::OutcomeConflict { .. } => StatusCode::CONFLICT,
            DeskError::CrossReportReference { .. } | DeskError::PrematureOutcome { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DeskError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("❌ Request failed: {}", self.0);
        }

        let body: ApiResponse<()> = ApiResponse::failure(self.0.to_string());
        (status, Json(body)).into_response()
    }
}
