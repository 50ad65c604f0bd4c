use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// HTTP-facing error. Keeps the domain taxonomy distinguishable so the status
/// code and the `error` code in the envelope stay faithful to the failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InsufficientStock(String),

    #[error("{0}")]
    EmptyCart(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            AppError::EmptyCart(_) => "EMPTY_CART",
            AppError::Validation(_) => "VALIDATION",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::NotFound(_) => AppError::NotFound(message),
            DomainError::Conflict(_) => AppError::Conflict(message),
            DomainError::InsufficientStock { .. } => AppError::InsufficientStock(message),
            DomainError::EmptyCart => AppError::EmptyCart(message),
            DomainError::Validation(_) => AppError::Validation(message),
            DomainError::Internal(_) => AppError::Internal(message),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let builder = match self {
            AppError::NotFound(_) => HttpResponse::NotFound(),
            AppError::Conflict(_) => HttpResponse::Conflict(),
            AppError::InsufficientStock(_) | AppError::EmptyCart(_) | AppError::Validation(_) => {
                HttpResponse::BadRequest()
            }
            AppError::Internal(_) => HttpResponse::InternalServerError(),
        };

        // Internal details stay in the logs, not on the wire.
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("internal error: {detail}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut builder = builder;
        builder.json(json!({
            "success": false,
            "error": self.code(),
            "message": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        use actix_web::http::StatusCode;

        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::InsufficientStock("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::EmptyCart("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.error_response().status(), status);
        }
    }

    #[test]
    fn domain_errors_keep_their_kind() {
        let err: AppError = DomainError::NotFound("Customer").into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = DomainError::InsufficientStock {
            product: "apples".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock(_)));
        assert_eq!(err.to_string(), "Insufficient stock for product: apples");

        let err: AppError = DomainError::EmptyCart.into();
        assert!(matches!(err, AppError::EmptyCart(_)));
    }

    #[test]
    fn internal_message_is_not_leaked() {
        let resp = AppError::Internal("connection refused".to_string()).error_response();
        let body = actix_web::body::to_bytes(resp.into_body());
        let body = futures::executor::block_on(body).expect("body");
        let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(parsed["message"], "Internal server error");
        assert_eq!(parsed["error"], "INTERNAL");
    }
}
