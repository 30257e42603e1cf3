use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Order, OrderDraft, PageResult};
use super::payment::{AuthParamsRequest, GatewayCallback, PendingIntent, PgAuthParams};
use super::point::PointEntry;

/// Durable order records.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_by_number(&self, order_number: &str) -> Result<Option<Order>, DomainError>;
    /// Newest first. `page` is 0-based; a page past the end yields an empty
    /// item list, not an error.
    fn list_paged(&self, member_id: Uuid, page: i64, size: i64) -> Result<PageResult, DomainError>;
    fn mark_paid(&self, id: Uuid) -> Result<Order, DomainError>;
    fn mark_cancelled(&self, id: Uuid, reason: &str) -> Result<Order, DomainError>;
}

/// The member's redeemable balance. Mutations serialize on the member's row
/// and are idempotent per order id, so a retried callback can never
/// double-deduct.
pub trait PointLedger: Send + Sync + 'static {
    fn balance(&self, member_id: Uuid) -> Result<i64, DomainError>;
    /// Returns the new balance. Calling twice with the same `order_id` is a
    /// no-op the second time.
    fn deduct(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError>;
    /// Reverses a prior deduction tied to `order_id`. Idempotent.
    fn refund(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError>;
    /// Journal of applied mutations for the member, newest first.
    fn history(&self, member_id: Uuid) -> Result<Vec<PointEntry>, DomainError>;
}

/// Ephemeral pending-payment intents, alive only between submission and
/// callback resolution.
pub trait PendingIntentStore: Send + Sync + 'static {
    fn put(&self, intent: PendingIntent) -> Result<(), DomainError>;
    /// Removes and returns the live intent for `order_number`. Expired
    /// intents are treated as absent.
    fn take(&self, order_number: &str) -> Result<Option<PendingIntent>, DomainError>;
}

/// External payment gateway boundary. Authorization itself happens in the
/// gateway's own UI; we only produce parameters for it and consume its
/// callback (validated elsewhere against the stored intent).
pub trait PaymentGateway: Send + Sync + 'static {
    fn auth_params(&self, request: AuthParamsRequest) -> Result<PgAuthParams, DomainError>;
    /// Flag an authorized-but-unreconciled transaction for asynchronous
    /// reversal. Best effort; failures are logged by the caller.
    fn request_reversal(&self, callback: &GatewayCallback) -> Result<(), DomainError>;
}
