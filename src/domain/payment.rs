use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::PaymentMethod;

/// The gateway's sole success sentinel; every other result code is a decline.
pub const GATEWAY_SUCCESS_CODE: &str = "0000";

/// How long the gateway keeps its authorization window open. Intents older
/// than this are dead and their callbacks must be rejected.
pub const INTENT_TTL: Duration = Duration::minutes(10);

/// Snapshot of the agreed order taken at submission time, keyed by order
/// number. The gateway callback is reconciled against this record, never
/// against client-resubmitted amounts. Consumed exactly once.
#[derive(Debug, Clone)]
pub struct PendingIntent {
    pub order_number: String,
    pub member_id: Uuid,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub point_amount: i64,
    pub card_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl PendingIntent {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > INTENT_TTL
    }
}

/// What the gateway redirect delivers back to us. `auth_token` and `tid` are
/// opaque; only `result_code` drives the outcome.
#[derive(Debug, Clone)]
pub struct GatewayCallback {
    pub order_number: String,
    pub result_code: String,
    pub result_msg: String,
    pub auth_token: String,
    pub tid: String,
}

impl GatewayCallback {
    pub fn is_success(&self) -> bool {
        self.result_code == GATEWAY_SUCCESS_CODE
    }
}

/// Supported gateway providers. Adding a provider means adding a variant and
/// a match arm in the adapter, not a new type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PgKind {
    NicePay,
    TossPay,
}

impl Default for PgKind {
    fn default() -> Self {
        PgKind::NicePay
    }
}

/// What the adapter needs to produce signed authorization parameters.
#[derive(Debug, Clone)]
pub struct AuthParamsRequest {
    pub order_number: String,
    pub amount: i64,
    pub product_name: String,
    pub provider: PgKind,
}

/// Opaque signed parameters the browser hands to the gateway's own UI.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PgAuthParams {
    pub provider: PgKind,
    pub merchant_id: String,
    pub order_number: String,
    pub amount: i64,
    pub product_name: String,
    pub timestamp: String,
    /// SHA-512 signature for NicePay, client key for TossPay.
    pub signature: String,
    pub return_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(created_at: DateTime<Utc>) -> PendingIntent {
        PendingIntent {
            order_number: "ORD1".into(),
            member_id: Uuid::new_v4(),
            product_name: "p".into(),
            unit_price: 1000,
            quantity: 1,
            payment_method: PaymentMethod::Card,
            point_amount: 0,
            card_amount: 1000,
            created_at,
        }
    }

    #[test]
    fn intent_expires_after_ttl() {
        let now = Utc::now();
        assert!(!intent(now).is_expired(now));
        assert!(!intent(now - Duration::minutes(9)).is_expired(now));
        assert!(intent(now - Duration::minutes(11)).is_expired(now));
    }

    #[test]
    fn only_0000_is_success() {
        let mut cb = GatewayCallback {
            order_number: "ORD1".into(),
            result_code: "0000".into(),
            result_msg: "ok".into(),
            auth_token: "t".into(),
            tid: "tid".into(),
        };
        assert!(cb.is_success());
        cb.result_code = "1001".into();
        assert!(!cb.is_success());
    }
}
