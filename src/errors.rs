use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// HTTP-facing wrapper over the domain taxonomy. The response body is always
/// `{kind, message}`; internal detail never reaches the wire.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub DomainError);

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation { .. } | DomainError::InsufficientBalance => {
                StatusCode::BAD_REQUEST
            }
            DomainError::GatewayAuthFailed { .. } => StatusCode::PAYMENT_REQUIRED,
            DomainError::IntentExpired => StatusCode::GONE,
            DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::Inconsistency(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "kind": self.0.kind(),
            "message": self.0.to_string(),
        }))
    }
}

impl AppError {
    /// For `web::block` join failures.
    pub fn blocking(e: actix_web::error::BlockingError) -> Self {
        AppError(DomainError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    use crate::domain::order::OrderStatus;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError(DomainError::validation("quantity", "bad"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn gateway_decline_maps_to_402() {
        let err = AppError(DomainError::GatewayAuthFailed {
            code: "1001".into(),
            message: "user cancelled".into(),
        });
        assert_eq!(err.status_code(), StatusCode::PAYMENT_REQUIRED);
        assert!(err.to_string().contains("user cancelled"));
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let err = AppError(DomainError::InvalidTransition {
            from: OrderStatus::Cancelled,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn expired_intent_maps_to_410() {
        assert_eq!(
            AppError(DomainError::IntentExpired).status_code(),
            StatusCode::GONE
        );
    }

    #[test]
    fn internal_detail_never_reaches_the_body() {
        let err = AppError(DomainError::Internal("db password leaked".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("db password"));
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        assert_eq!(
            AppError(DomainError::Unauthenticated).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
