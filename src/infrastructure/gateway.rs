use chrono::Utc;
use sha2::{Digest, Sha512};

use crate::domain::errors::DomainError;
use crate::domain::payment::{AuthParamsRequest, GatewayCallback, PgAuthParams, PgKind};
use crate::domain::ports::PaymentGateway;

/// Merchant credentials for the supported gateway providers, loaded from the
/// environment at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_id: String,
    /// NicePay request-signing key.
    pub sign_key: String,
    /// TossPay public client key.
    pub client_key: String,
    /// Where the gateway redirects the browser after authorization.
    pub return_url: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            merchant_id: std::env::var("PG_MERCHANT_ID").unwrap_or_else(|_| "TESTMID00".into()),
            sign_key: std::env::var("PG_SIGN_KEY").unwrap_or_else(|_| "test-sign-key".into()),
            client_key: std::env::var("PG_CLIENT_KEY").unwrap_or_else(|_| "test_ck_docs".into()),
            return_url: std::env::var("PG_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:8080/pg/callback".into()),
        }
    }
}

/// Produces the signed parameter set each provider's checkout UI expects.
/// Authorization and signature verification happen on the gateway side; this
/// adapter only prepares the hand-off and flags reversals.
pub struct SignedParamsGateway {
    config: GatewayConfig,
}

impl SignedParamsGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    fn nicepay_signature(&self, order_number: &str, amount: i64, timestamp: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(order_number.as_bytes());
        hasher.update(amount.to_string().as_bytes());
        hasher.update(timestamp.as_bytes());
        hasher.update(self.config.sign_key.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PaymentGateway for SignedParamsGateway {
    fn auth_params(&self, request: AuthParamsRequest) -> Result<PgAuthParams, DomainError> {
        if request.amount <= 0 {
            return Err(DomainError::validation(
                "amount",
                "Gateway amount must be positive",
            ));
        }

        let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let signature = match request.provider {
            PgKind::NicePay => {
                self.nicepay_signature(&request.order_number, request.amount, &timestamp)
            }
            PgKind::TossPay => self.config.client_key.clone(),
        };

        Ok(PgAuthParams {
            provider: request.provider,
            merchant_id: self.config.merchant_id.clone(),
            order_number: request.order_number,
            amount: request.amount,
            product_name: request.product_name,
            timestamp,
            signature,
            return_url: self.config.return_url.clone(),
        })
    }

    fn request_reversal(&self, callback: &GatewayCallback) -> Result<(), DomainError> {
        // The reversal itself is settled out-of-band by the provider's
        // back-office channel; here the transaction is flagged and handed to
        // reconciliation.
        log::warn!(
            "gateway transaction flagged for reversal - number: {}, tid: {}",
            callback.order_number,
            callback.tid,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SignedParamsGateway {
        SignedParamsGateway::new(GatewayConfig {
            merchant_id: "MID001".into(),
            sign_key: "secret".into(),
            client_key: "ck_live".into(),
            return_url: "http://localhost/pg/callback".into(),
        })
    }

    fn request(provider: PgKind) -> AuthParamsRequest {
        AuthParamsRequest {
            order_number: "ORD20260101000000000123".into(),
            amount: 15_000,
            product_name: "Laptop stand".into(),
            provider,
        }
    }

    #[test]
    fn nicepay_params_carry_sha512_signature() {
        let params = gateway().auth_params(request(PgKind::NicePay)).unwrap();
        assert_eq!(params.merchant_id, "MID001");
        assert_eq!(params.amount, 15_000);
        // hex-encoded SHA-512 is 128 chars
        assert_eq!(params.signature.len(), 128);
        assert!(params.signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_is_deterministic_for_same_inputs() {
        let gw = gateway();
        let a = gw.nicepay_signature("ORD1", 1_000, "20260101000000");
        let b = gw.nicepay_signature("ORD1", 1_000, "20260101000000");
        let c = gw.nicepay_signature("ORD1", 1_001, "20260101000000");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn tosspay_params_carry_client_key() {
        let params = gateway().auth_params(request(PgKind::TossPay)).unwrap();
        assert_eq!(params.signature, "ck_live");
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let mut req = request(PgKind::NicePay);
        req.amount = 0;
        assert!(gateway().auth_params(req).is_err());
    }
}
