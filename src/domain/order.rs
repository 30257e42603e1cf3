use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

pub const MAX_PRODUCT_NAME_LEN: usize = 100;
pub const MAX_UNIT_PRICE: i64 = 10_000_000;
pub const MAX_QUANTITY: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown order status '{other}'"
            ))),
        }
    }

    /// PAID and CANCELLED never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    Point,
    Mixed,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Point => "POINT",
            PaymentMethod::Mixed => "MIXED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "CARD" => Ok(PaymentMethod::Card),
            "POINT" => Ok(PaymentMethod::Point),
            "MIXED" => Ok(PaymentMethod::Mixed),
            other => Err(DomainError::Internal(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }

    pub fn involves_card(&self) -> bool {
        matches!(self, PaymentMethod::Card | PaymentMethod::Mixed)
    }
}

/// Fully-resolved order as stored. `point_amount + card_amount` always equals
/// `unit_price * quantity`.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub member_id: Uuid,
    pub order_number: String,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub point_amount: i64,
    pub card_amount: i64,
    pub status: OrderStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn total_amount(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}

/// What the order record store is asked to persist. Amounts are the split the
/// orchestrator computed, never client-resubmitted values.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub member_id: Uuid,
    pub order_number: String,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub point_amount: i64,
    pub card_amount: i64,
    pub status: OrderStatus,
}

/// Shape/bounds validation for client-declared product fields, done at the
/// boundary before any split computation.
pub fn validate_product_fields(
    product_name: &str,
    unit_price: i64,
    quantity: i32,
) -> Result<(), DomainError> {
    if product_name.trim().is_empty() {
        return Err(DomainError::validation(
            "productName",
            "Product name is required",
        ));
    }
    if product_name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(DomainError::validation(
            "productName",
            format!("Product name must be at most {MAX_PRODUCT_NAME_LEN} characters"),
        ));
    }
    if !(1..=MAX_UNIT_PRICE).contains(&unit_price) {
        return Err(DomainError::validation(
            "productPrice",
            format!("Product price must be between 1 and {MAX_UNIT_PRICE}"),
        ));
    }
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(DomainError::validation(
            "quantity",
            format!("Quantity must be between 1 and {MAX_QUANTITY}"),
        ));
    }
    Ok(())
}

/// Generate a globally unique order number: "ORD" + millisecond timestamp +
/// three random digits.
pub fn generate_order_number() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S%3f");
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("ORD{timestamp}{suffix:03}")
}

#[derive(Debug, Clone)]
pub struct PageResult {
    pub items: Vec<Order>,
    pub total_count: i64,
    pub page: i64,
    pub size: i64,
}

impl PageResult {
    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        (self.total_count + self.size - 1) / self.size
    }
}
