use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PointEntryKind {
    Deduct,
    Refund,
}

impl PointEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointEntryKind::Deduct => "DEDUCT",
            PointEntryKind::Refund => "REFUND",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "DEDUCT" => Ok(PointEntryKind::Deduct),
            "REFUND" => Ok(PointEntryKind::Refund),
            other => Err(DomainError::Internal(format!(
                "unknown point entry type '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for PointEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applied ledger mutation, as journaled. The journal is append-only;
/// `balance_after` is the balance the mutation left behind.
#[derive(Debug, Clone)]
pub struct PointEntry {
    pub order_id: Uuid,
    pub kind: PointEntryKind,
    pub amount: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}
