use thiserror::Error;

use super::order::OrderStatus;

/// Business-level failure taxonomy. Every variant carries a stable,
/// user-displayable message; `kind()` gives the machine-readable code that
/// goes out on the wire next to it.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Point balance is insufficient")]
    InsufficientBalance,

    #[error("Payment was declined by the gateway: {message}")]
    GatewayAuthFailed { code: String, message: String },

    /// No live pending intent matched the callback. Either the auth window
    /// lapsed or the redirect was replayed after resolution was discarded.
    #[error("Payment session has expired, please start the payment again")]
    IntentExpired,

    #[error("Order cannot be cancelled from status {from}")]
    InvalidTransition { from: OrderStatus },

    #[error("Not found")]
    NotFound,

    #[error("Login required")]
    Unauthenticated,

    #[error("No permission to access this order")]
    Forbidden,

    /// Order confirmed but a dependent mutation failed; the compensating
    /// rollback has run and the incident must be escalated, never swallowed.
    #[error("Payment reconciliation failed, the order has been cancelled")]
    Inconsistency(String),

    #[error("Internal error")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION",
            DomainError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            DomainError::GatewayAuthFailed { .. } => "GATEWAY_AUTH_FAILED",
            DomainError::IntentExpired => "INTENT_EXPIRED",
            DomainError::InvalidTransition { .. } => "INVALID_TRANSITION",
            DomainError::NotFound => "NOT_FOUND",
            DomainError::Unauthenticated => "UNAUTHENTICATED",
            DomainError::Forbidden => "FORBIDDEN",
            DomainError::Inconsistency(_) => "RECONCILIATION_INCIDENT",
            DomainError::Internal(_) => "INTERNAL",
        }
    }
}
