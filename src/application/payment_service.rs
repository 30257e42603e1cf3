use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    generate_order_number, validate_product_fields, Order, OrderDraft, OrderStatus, PaymentMethod,
};
use crate::domain::payment::{AuthParamsRequest, GatewayCallback, PendingIntent, PgAuthParams, PgKind};
use crate::domain::ports::{OrderRepository, PaymentGateway, PendingIntentStore, PointLedger};
use crate::domain::split::compute_split;

/// Client-declared order intent, as received at the boundary. Amounts in here
/// are requests, not commitments; the split calculator decides what is
/// actually charged.
#[derive(Debug, Clone)]
pub struct SubmitOrder {
    pub product_name: String,
    pub product_price: i64,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub point_amount: i64,
    pub provider: PgKind,
}

/// Outcome of an order submission.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// POINT-only orders settle without a gateway round-trip.
    Settled(Order),
    /// Card-involving orders hand control to the gateway; an order record
    /// does not exist until the callback reconciles successfully.
    AwaitingGateway {
        order_number: String,
        params: PgAuthParams,
    },
}

#[derive(Debug, Clone)]
pub enum CallbackOutcome {
    Settled(Order),
    /// Redelivery of a callback for an already-resolved order. Not an error.
    Duplicate(Order),
}

/// The order–payment reconciliation core. Drives
/// Created → AwaitingGatewayAuth → Reconciling → Settled | Failed, with
/// POINT-only orders short-circuiting Created → Settled.
#[derive(Clone)]
pub struct PaymentService {
    orders: Arc<dyn OrderRepository>,
    ledger: Arc<dyn PointLedger>,
    intents: Arc<dyn PendingIntentStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        ledger: Arc<dyn PointLedger>,
        intents: Arc<dyn PendingIntentStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            orders,
            ledger,
            intents,
            gateway,
        }
    }

    /// Entry point for `POST /order/create`. Validates shape and bounds,
    /// computes the split against the current balance, then either settles a
    /// POINT order immediately or parks a pending intent and returns gateway
    /// auth parameters.
    pub fn submit(&self, member_id: Uuid, req: SubmitOrder) -> Result<SubmissionOutcome, DomainError> {
        validate_product_fields(&req.product_name, req.product_price, req.quantity)?;
        let total = req.product_price * req.quantity as i64;

        let balance = self.ledger.balance(member_id)?;
        let split = compute_split(total, req.payment_method, req.point_amount, balance)?;
        let order_number = generate_order_number();

        log::info!(
            "order submitted - member: {}, number: {}, method: {}, total: {}, card: {}, points: {}",
            member_id,
            order_number,
            req.payment_method.as_str(),
            total,
            split.card_amount,
            split.point_amount,
        );

        if !req.payment_method.involves_card() {
            let order = self.settle_point_order(member_id, &order_number, &req, split.point_amount)?;
            return Ok(SubmissionOutcome::Settled(order));
        }

        self.intents.put(PendingIntent {
            order_number: order_number.clone(),
            member_id,
            product_name: req.product_name.clone(),
            unit_price: req.product_price,
            quantity: req.quantity,
            payment_method: req.payment_method,
            point_amount: split.point_amount,
            card_amount: split.card_amount,
            created_at: Utc::now(),
        })?;

        let params = self.gateway.auth_params(AuthParamsRequest {
            order_number: order_number.clone(),
            amount: split.card_amount,
            product_name: req.product_name,
            provider: req.provider,
        })?;

        Ok(SubmissionOutcome::AwaitingGateway {
            order_number,
            params,
        })
    }

    /// Entry point for the gateway redirect. Idempotent per order number:
    /// a callback for an already-resolved order is a logged no-op.
    pub fn handle_callback(&self, cb: GatewayCallback) -> Result<CallbackOutcome, DomainError> {
        if let Some(existing) = self.orders.find_by_number(&cb.order_number)? {
            if existing.status.is_terminal() {
                log::info!(
                    "duplicate gateway callback ignored - number: {}, status: {}",
                    cb.order_number,
                    existing.status,
                );
                return Ok(CallbackOutcome::Duplicate(existing));
            }
        }

        let Some(intent) = self.intents.take(&cb.order_number)? else {
            log::warn!(
                "gateway callback with no live intent - number: {}",
                cb.order_number
            );
            return Err(DomainError::IntentExpired);
        };

        if !cb.is_success() {
            log::warn!(
                "gateway declined - number: {}, code: {}, msg: {}",
                cb.order_number,
                cb.result_code,
                cb.result_msg,
            );
            return Err(DomainError::GatewayAuthFailed {
                code: cb.result_code,
                message: cb.result_msg,
            });
        }

        // Re-derive the committed order from the stored intent; nothing in
        // the callback besides the result code is trusted.
        let order = self.orders.create(OrderDraft {
            member_id: intent.member_id,
            order_number: intent.order_number.clone(),
            product_name: intent.product_name.clone(),
            unit_price: intent.unit_price,
            quantity: intent.quantity,
            payment_method: intent.payment_method,
            point_amount: intent.point_amount,
            card_amount: intent.card_amount,
            status: OrderStatus::Pending,
        })?;

        if intent.point_amount > 0 {
            if let Err(e) = self
                .ledger
                .deduct(intent.member_id, intent.point_amount, order.id)
            {
                return Err(self.roll_back_after_deduct_failure(&cb, order, e));
            }
        }

        let order = self.orders.mark_paid(order.id)?;
        log::info!(
            "payment settled - number: {}, order: {}, tid: {}",
            order.order_number,
            order.id,
            cb.tid,
        );
        Ok(CallbackOutcome::Settled(order))
    }

    /// Signed parameters for a stand-alone checkout popup, outside the
    /// submission flow. Generates a fresh order number; no intent is parked.
    pub fn preview_auth_params(
        &self,
        member_id: Uuid,
        amount: i64,
        product_name: String,
        provider: PgKind,
    ) -> Result<PgAuthParams, DomainError> {
        log::info!(
            "auth params requested - member: {}, amount: {}, provider: {:?}",
            member_id,
            amount,
            provider
        );
        self.gateway.auth_params(AuthParamsRequest {
            order_number: generate_order_number(),
            amount,
            product_name,
            provider,
        })
    }

    fn settle_point_order(
        &self,
        member_id: Uuid,
        order_number: &str,
        req: &SubmitOrder,
        point_amount: i64,
    ) -> Result<Order, DomainError> {
        let order = self.orders.create(OrderDraft {
            member_id,
            order_number: order_number.to_owned(),
            product_name: req.product_name.clone(),
            unit_price: req.product_price,
            quantity: req.quantity,
            payment_method: PaymentMethod::Point,
            point_amount,
            card_amount: 0,
            status: OrderStatus::Pending,
        })?;

        // Balance was checked by the split calculator, but a concurrent
        // deduction may have raced us; compensate by cancelling the order.
        if let Err(e) = self.ledger.deduct(member_id, point_amount, order.id) {
            log::warn!(
                "point deduction failed after order creation - order: {}, err: {}",
                order.id,
                e
            );
            self.orders
                .mark_cancelled(order.id, "point deduction failed")?;
            return Err(e);
        }

        self.orders.mark_paid(order.id)
    }

    /// Order row exists but the deduction failed: mark it CANCELLED and flag
    /// the gateway transaction for reversal. Two physical operations treated
    /// as one logical unit, so this never passes silently.
    fn roll_back_after_deduct_failure(
        &self,
        cb: &GatewayCallback,
        order: Order,
        cause: DomainError,
    ) -> DomainError {
        log::error!(
            "reconciliation incident - order {} created but deduction failed ({}); cancelling and flagging tid {} for reversal",
            order.id,
            cause,
            cb.tid,
        );
        if let Err(e) = self.orders.mark_cancelled(order.id, "point deduction failed") {
            log::error!("compensating cancel failed for order {}: {}", order.id, e);
        }
        if let Err(e) = self.gateway.request_reversal(cb) {
            log::error!("reversal flag failed for tid {}: {}", cb.tid, e);
        }
        DomainError::Inconsistency(format!(
            "order {} cancelled after failed point deduction: {cause}",
            order.order_number
        ))
    }
}
