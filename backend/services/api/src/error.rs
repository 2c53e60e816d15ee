use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use resolver_common::error::ResolverError;

pub struct ApiError(pub ResolverError);

impl From<ResolverError> for ApiError {
    fn from(err: ResolverError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ResolverError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ResolverError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ResolverError::Agent(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        let cases = [
            (ResolverError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ResolverError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ResolverError::Agent("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ResolverError::Upstream("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }
}
