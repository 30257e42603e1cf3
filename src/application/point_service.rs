use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::point::PointEntry;
use crate::domain::ports::PointLedger;

/// Thin façade over the point ledger. Amount sanity lives here; balance
/// arithmetic and idempotency live behind the port.
#[derive(Clone)]
pub struct PointService {
    ledger: Arc<dyn PointLedger>,
}

impl PointService {
    pub fn new(ledger: Arc<dyn PointLedger>) -> Self {
        Self { ledger }
    }

    pub fn balance(&self, member_id: Uuid) -> Result<i64, DomainError> {
        self.ledger.balance(member_id)
    }

    pub fn deduct(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation(
                "amount",
                "Deduction amount must be positive",
            ));
        }
        self.ledger.deduct(member_id, amount, order_id)
    }

    pub fn refund(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation(
                "amount",
                "Refund amount must be positive",
            ));
        }
        self.ledger.refund(member_id, amount, order_id)
    }

    pub fn history(&self, member_id: Uuid) -> Result<Vec<PointEntry>, DomainError> {
        self.ledger.history(member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures::InMemoryLedger;
    use crate::domain::point::PointEntryKind;

    #[test]
    fn rejects_non_positive_amounts() {
        let svc = PointService::new(Arc::new(InMemoryLedger::with_balance(Uuid::new_v4(), 100)));
        let member = Uuid::new_v4();
        assert!(svc.deduct(member, 0, Uuid::new_v4()).is_err());
        assert!(svc.refund(member, -10, Uuid::new_v4()).is_err());
    }

    #[test]
    fn deduct_and_refund_roundtrip() {
        let member = Uuid::new_v4();
        let svc = PointService::new(Arc::new(InMemoryLedger::with_balance(member, 1_000)));
        let order = Uuid::new_v4();

        assert_eq!(svc.deduct(member, 400, order).unwrap(), 600);
        assert_eq!(svc.refund(member, 400, order).unwrap(), 1_000);
        assert_eq!(svc.balance(member).unwrap(), 1_000);
    }

    #[test]
    fn failed_deduction_leaves_the_order_retryable() {
        let member = Uuid::new_v4();
        let svc = PointService::new(Arc::new(InMemoryLedger::with_balance(member, 100)));
        let order = Uuid::new_v4();

        assert!(matches!(
            svc.deduct(member, 500, order),
            Err(DomainError::InsufficientBalance)
        ));
        svc.refund(member, 900, Uuid::new_v4()).unwrap();

        // The failed attempt must not have consumed the order id.
        assert_eq!(svc.deduct(member, 500, order).unwrap(), 500);
    }

    #[test]
    fn history_lists_mutations_newest_first() {
        let member = Uuid::new_v4();
        let svc = PointService::new(Arc::new(InMemoryLedger::with_balance(member, 1_000)));
        let order = Uuid::new_v4();

        svc.deduct(member, 400, order).unwrap();
        svc.refund(member, 400, order).unwrap();

        let history = svc.history(member).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, PointEntryKind::Refund);
        assert_eq!(history[0].balance_after, 1_000);
        assert_eq!(history[1].kind, PointEntryKind::Deduct);
        assert_eq!(history[1].balance_after, 600);
    }
}
