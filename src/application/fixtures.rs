//! In-memory port implementations for service-level tests. They mirror the
//! contracts of the diesel adapters, including per-order idempotency in the
//! ledger.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDraft, OrderStatus, PageResult};
use crate::domain::payment::{AuthParamsRequest, GatewayCallback, PgAuthParams};
use crate::domain::point::{PointEntry, PointEntryKind};
use crate::domain::ports::{OrderRepository, PaymentGateway, PointLedger};
use crate::infrastructure::intent_store::InMemoryIntentStore;

#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<Vec<Order>>,
}

impl InMemoryOrders {
    pub fn all(&self) -> Vec<Order> {
        self.rows.lock().unwrap().clone()
    }
}

impl OrderRepository for InMemoryOrders {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            member_id: draft.member_id,
            order_number: draft.order_number,
            product_name: draft.product_name,
            unit_price: draft.unit_price,
            quantity: draft.quantity,
            payment_method: draft.payment_method,
            point_amount: draft.point_amount,
            card_amount: draft.card_amount,
            status: draft.status,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    fn find_by_number(&self, order_number: &str) -> Result<Option<Order>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    fn list_paged(&self, member_id: Uuid, page: i64, size: i64) -> Result<PageResult, DomainError> {
        let mut rows: Vec<Order> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.member_id == member_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total_count = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip((page * size) as usize)
            .take(size as usize)
            .collect();
        Ok(PageResult {
            items,
            total_count,
            page,
            size,
        })
    }

    fn mark_paid(&self, id: Uuid) -> Result<Order, DomainError> {
        self.update(id, |o| {
            o.status = OrderStatus::Paid;
            o.updated_at = Utc::now();
        })
    }

    fn mark_cancelled(&self, id: Uuid, reason: &str) -> Result<Order, DomainError> {
        self.update(id, |o| {
            o.status = OrderStatus::Cancelled;
            o.cancel_reason = Some(reason.to_owned());
            o.updated_at = Utc::now();
        })
    }
}

impl InMemoryOrders {
    fn update(&self, id: Uuid, f: impl FnOnce(&mut Order)) -> Result<Order, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let order = rows
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::NotFound)?;
        f(order);
        Ok(order.clone())
    }
}

#[derive(Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<Uuid, i64>>,
    applied: Mutex<HashSet<(Uuid, PointEntryKind)>>,
    entries: Mutex<HashMap<Uuid, Vec<PointEntry>>>,
    /// When set, every deduction fails; simulates a concurrent balance race.
    fail_deductions: bool,
}

impl InMemoryLedger {
    pub fn with_balance(member_id: Uuid, balance: i64) -> Self {
        let ledger = Self::default();
        ledger.balances.lock().unwrap().insert(member_id, balance);
        ledger
    }

    pub fn failing(member_id: Uuid, balance: i64) -> Self {
        let mut ledger = Self::with_balance(member_id, balance);
        ledger.fail_deductions = true;
        ledger
    }
}

impl InMemoryLedger {
    fn journal(&self, member_id: Uuid, order_id: Uuid, kind: PointEntryKind, amount: i64, balance_after: i64) {
        self.entries
            .lock()
            .unwrap()
            .entry(member_id)
            .or_default()
            .push(PointEntry {
                order_id,
                kind,
                amount,
                balance_after,
                created_at: Utc::now(),
            });
    }
}

impl PointLedger for InMemoryLedger {
    fn balance(&self, member_id: Uuid) -> Result<i64, DomainError> {
        Ok(*self.balances.lock().unwrap().get(&member_id).unwrap_or(&0))
    }

    fn deduct(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError> {
        if self.fail_deductions {
            return Err(DomainError::InsufficientBalance);
        }
        if self.applied.lock().unwrap().contains(&(order_id, PointEntryKind::Deduct)) {
            return self.balance(member_id);
        }
        let balance_after = {
            let mut balances = self.balances.lock().unwrap();
            let balance = balances.entry(member_id).or_insert(0);
            if *balance < amount {
                return Err(DomainError::InsufficientBalance);
            }
            *balance -= amount;
            *balance
        };
        // Applied only after the balance check passed; a failed attempt must
        // leave the order id retryable.
        self.applied.lock().unwrap().insert((order_id, PointEntryKind::Deduct));
        self.journal(member_id, order_id, PointEntryKind::Deduct, amount, balance_after);
        Ok(balance_after)
    }

    fn refund(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError> {
        if !self.applied.lock().unwrap().insert((order_id, PointEntryKind::Refund)) {
            return self.balance(member_id);
        }
        let balance_after = {
            let mut balances = self.balances.lock().unwrap();
            let balance = balances.entry(member_id).or_insert(0);
            *balance += amount;
            *balance
        };
        self.journal(member_id, order_id, PointEntryKind::Refund, amount, balance_after);
        Ok(balance_after)
    }

    fn history(&self, member_id: Uuid) -> Result<Vec<PointEntry>, DomainError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap()
            .get(&member_id)
            .cloned()
            .unwrap_or_default();
        entries.reverse();
        Ok(entries)
    }
}

#[derive(Default)]
pub struct StubGateway {
    reversals: AtomicUsize,
}

impl StubGateway {
    pub fn reversal_count(&self) -> usize {
        self.reversals.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for StubGateway {
    fn auth_params(&self, request: AuthParamsRequest) -> Result<PgAuthParams, DomainError> {
        Ok(PgAuthParams {
            provider: request.provider,
            merchant_id: "TESTMID".into(),
            order_number: request.order_number,
            amount: request.amount,
            product_name: request.product_name,
            timestamp: "20260101000000".into(),
            signature: "stub-signature".into(),
            return_url: "http://localhost/pg/callback".into(),
        })
    }

    fn request_reversal(&self, _callback: &GatewayCallback) -> Result<(), DomainError> {
        self.reversals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn orders() -> Arc<InMemoryOrders> {
    Arc::new(InMemoryOrders::default())
}

pub fn ledger(member_id: Uuid, balance: i64) -> Arc<InMemoryLedger> {
    Arc::new(InMemoryLedger::with_balance(member_id, balance))
}

pub fn failing_ledger(member_id: Uuid, balance: i64) -> Arc<InMemoryLedger> {
    Arc::new(InMemoryLedger::failing(member_id, balance))
}

pub fn intents() -> Arc<InMemoryIntentStore> {
    Arc::new(InMemoryIntentStore::new())
}

pub fn gateway() -> Arc<StubGateway> {
    Arc::new(StubGateway::default())
}
