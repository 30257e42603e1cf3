use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus, PaymentMethod};
use crate::domain::point::{PointEntry, PointEntryKind};
use crate::schema::{orders, point_entries, points};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub order_number: String,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub payment_method: String,
    pub point_amount: i64,
    pub card_amount: i64,
    pub status: String,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_domain(self) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            member_id: self.member_id,
            order_number: self.order_number,
            product_name: self.product_name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            payment_method: PaymentMethod::parse(&self.payment_method)?,
            point_amount: self.point_amount,
            card_amount: self.card_amount,
            status: OrderStatus::parse(&self.status)?,
            cancel_reason: self.cancel_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub order_number: String,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub payment_method: String,
    pub point_amount: i64,
    pub card_amount: i64,
    pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = points)]
pub struct NewPointRow {
    pub member_id: Uuid,
    pub balance: i64,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = point_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PointEntryRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub order_id: Uuid,
    pub entry_type: String,
    pub amount: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

impl PointEntryRow {
    pub fn into_domain(self) -> Result<PointEntry, DomainError> {
        Ok(PointEntry {
            order_id: self.order_id,
            kind: PointEntryKind::parse(&self.entry_type)?,
            amount: self.amount,
            balance_after: self.balance_after,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = point_entries)]
pub struct NewPointEntryRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub order_id: Uuid,
    pub entry_type: String,
    pub amount: i64,
    pub balance_after: i64,
}
