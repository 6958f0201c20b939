use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::error;

/// Everything a handler can fail with. Every variant renders as a JSON
/// body of the form `{"message": <human string>}`.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Missing or malformed input.
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Bad credentials.
    #[display(fmt = "{}", _0)]
    Auth(String),

    /// Authenticated but wrong role.
    #[display(fmt = "{}", _0)]
    Forbidden(String),

    /// Guard-condition violations (AlreadyCheckedIn, AlreadyCheckedOut,
    /// NotCheckedInYet) and duplicate email/employee id.
    #[display(fmt = "{}", _0)]
    Conflict(String),

    /// Store-layer failure. Logged at the boundary; the client only ever
    /// sees a generic message.
    #[display(fmt = "Server error")]
    Store,
}

impl ApiError {
    /// Converts a sqlx failure at the handler boundary, logging the detail
    /// that the client response hides.
    pub fn store(err: sqlx::Error) -> Self {
        error!(error = %err, "database query failed");
        ApiError::Store
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Store => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn repeat_check_in_renders_its_message_as_bad_request() {
        let err = ApiError::Conflict("Already checked in today".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Already checked in today");
    }

    #[test]
    fn store_error_hides_detail() {
        assert_eq!(ApiError::Store.to_string(), "Server error");
    }
}
