use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::point::{PointEntry, PointEntryKind};
use crate::domain::ports::PointLedger;
use crate::schema::{point_entries, points};

use super::models::{NewPointEntryRow, NewPointRow, PointEntryRow};

/// Diesel-backed point ledger. Deduction is a single-row conditional update
/// (`balance >= amount` in the WHERE clause), so two concurrent deductions
/// for the same member serialize on the row and can never overdraw.
/// Idempotency per order id comes from the journal's unique
/// (order_id, entry_type) constraint, checked inside the same transaction.
pub struct DieselPointLedger {
    pool: DbPool,
}

impl DieselPointLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Upsert a member's balance. Seeding/admin path, not part of the port.
    pub fn set_balance(&self, member_id: Uuid, balance: i64) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(points::table)
            .values(&NewPointRow { member_id, balance })
            .on_conflict(points::member_id)
            .do_update()
            .set((
                points::balance.eq(balance),
                points::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(())
    }
}

fn current_balance(conn: &mut PgConnection, member_id: Uuid) -> Result<i64, DomainError> {
    let balance: Option<i64> = points::table
        .filter(points::member_id.eq(member_id))
        .select(points::balance)
        .first(conn)
        .optional()?;
    Ok(balance.unwrap_or(0))
}

fn journal_entry(
    conn: &mut PgConnection,
    order_id: Uuid,
    kind: PointEntryKind,
) -> Result<Option<PointEntryRow>, DomainError> {
    let row = point_entries::table
        .filter(
            point_entries::order_id
                .eq(order_id)
                .and(point_entries::entry_type.eq(kind.as_str())),
        )
        .select(PointEntryRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

impl PointLedger for DieselPointLedger {
    fn balance(&self, member_id: Uuid) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        current_balance(&mut conn, member_id)
    }

    fn deduct(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if journal_entry(conn, order_id, PointEntryKind::Deduct)?.is_some() {
                log::info!("deduction already applied for order {order_id}; no-op");
                return current_balance(conn, member_id);
            }

            let updated = diesel::update(
                points::table.filter(
                    points::member_id
                        .eq(member_id)
                        .and(points::balance.ge(amount)),
                ),
            )
            .set((
                points::balance.eq(points::balance - amount),
                points::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

            if updated == 0 {
                return Err(DomainError::InsufficientBalance);
            }

            let balance_after = current_balance(conn, member_id)?;
            diesel::insert_into(point_entries::table)
                .values(&NewPointEntryRow {
                    id: Uuid::new_v4(),
                    member_id,
                    order_id,
                    entry_type: PointEntryKind::Deduct.as_str().to_owned(),
                    amount,
                    balance_after,
                })
                .execute(conn)?;

            Ok(balance_after)
        })
    }

    fn refund(&self, member_id: Uuid, amount: i64, order_id: Uuid) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if journal_entry(conn, order_id, PointEntryKind::Refund)?.is_some() {
                log::info!("refund already applied for order {order_id}; no-op");
                return current_balance(conn, member_id);
            }

            diesel::insert_into(points::table)
                .values(&NewPointRow {
                    member_id,
                    balance: amount,
                })
                .on_conflict(points::member_id)
                .do_update()
                .set((
                    points::balance.eq(points::balance + amount),
                    points::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            let balance_after = current_balance(conn, member_id)?;
            diesel::insert_into(point_entries::table)
                .values(&NewPointEntryRow {
                    id: Uuid::new_v4(),
                    member_id,
                    order_id,
                    entry_type: PointEntryKind::Refund.as_str().to_owned(),
                    amount,
                    balance_after,
                })
                .execute(conn)?;

            Ok(balance_after)
        })
    }

    fn history(&self, member_id: Uuid) -> Result<Vec<PointEntry>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<PointEntryRow> = point_entries::table
            .filter(point_entries::member_id.eq(member_id))
            .select(PointEntryRow::as_select())
            .order(point_entries::created_at.desc())
            .load(&mut conn)?;

        rows.into_iter().map(PointEntryRow::into_domain).collect()
    }
}
