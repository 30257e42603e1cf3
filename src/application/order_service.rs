use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus, PageResult};
use crate::domain::ports::{OrderRepository, PointLedger};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Read and cancellation paths over stored orders. Creation goes through the
/// payment orchestrator.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    ledger: Arc<dyn PointLedger>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, ledger: Arc<dyn PointLedger>) -> Self {
        Self { orders, ledger }
    }

    pub fn get_order(&self, member_id: Uuid, order_id: Uuid) -> Result<Order, DomainError> {
        let order = self.orders.find_by_id(order_id)?.ok_or(DomainError::NotFound)?;
        if order.member_id != member_id {
            return Err(DomainError::Forbidden);
        }
        Ok(order)
    }

    pub fn list_orders(
        &self,
        member_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<PageResult, DomainError> {
        // Cap keeps `page * size` inside i64 for any allowed size.
        let page = page.clamp(0, i64::MAX / MAX_PAGE_SIZE);
        let size = size.clamp(1, MAX_PAGE_SIZE);
        self.orders.list_paged(member_id, page, size)
    }

    /// Cancellation is allowed only from PENDING or PAID. Cancelling a PAID
    /// order refunds any redeemed points; a card charge is flagged for
    /// out-of-band reversal.
    pub fn cancel_order(&self, member_id: Uuid, order_id: Uuid) -> Result<Order, DomainError> {
        let order = self.get_order(member_id, order_id)?;

        if order.status == OrderStatus::Cancelled {
            return Err(DomainError::InvalidTransition { from: order.status });
        }

        let cancelled = self.orders.mark_cancelled(order_id, "cancelled by user")?;

        if order.status == OrderStatus::Paid {
            if order.point_amount > 0 {
                // Refund is idempotent per order id; a failure here is logged
                // and escalated rather than blocking the cancellation.
                if let Err(e) = self.ledger.refund(member_id, order.point_amount, order_id) {
                    log::error!(
                        "point refund failed on cancellation - order: {}, amount: {}, err: {}",
                        order_id,
                        order.point_amount,
                        e
                    );
                }
            }
            if order.card_amount > 0 {
                log::warn!(
                    "order {} cancelled with card amount {}; gateway reversal required",
                    order.order_number,
                    order.card_amount
                );
            }
        }

        log::info!("order cancelled - number: {}", cancelled.order_number);
        Ok(cancelled)
    }
}
