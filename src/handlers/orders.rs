use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{OrderService, DEFAULT_PAGE_SIZE};
use crate::application::payment_service::{PaymentService, SubmissionOutcome, SubmitOrder};
use crate::domain::order::{Order, OrderStatus, PageResult, PaymentMethod};
use crate::domain::payment::{PgAuthParams, PgKind};
use crate::errors::AppError;

use super::auth::MemberId;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_name: String,
    pub product_price: i64,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    /// Points the buyer wants to redeem. Ignored for CARD, must cover the
    /// total for POINT.
    #[serde(default)]
    pub point_amount: i64,
    #[serde(default)]
    pub pg_provider: PgKind,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Present once an order record exists; absent while the payment is
    /// parked with the gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    pub order_number: String,
    pub status: OrderStatus,
    pub message: String,
    /// Signed gateway parameters for card-involving orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<PgAuthParams>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub product_name: String,
    pub product_price: i64,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub total_amount: i64,
    pub point_amount: i64,
    pub card_amount: i64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            order_id: o.id,
            order_number: o.order_number.clone(),
            product_name: o.product_name.clone(),
            product_price: o.unit_price,
            quantity: o.quantity,
            payment_method: o.payment_method,
            total_amount: o.total_amount(),
            point_amount: o.point_amount,
            card_amount: o.card_amount,
            status: o.status,
            cancel_reason: o.cancel_reason,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// 0-based page number.
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub total_count: i64,
    pub total_pages: i64,
    pub page: i64,
    pub size: i64,
}

impl From<PageResult> for ListOrdersResponse {
    fn from(page: PageResult) -> Self {
        ListOrdersResponse {
            total_count: page.total_count,
            total_pages: page.total_pages(),
            page: page.page,
            size: page.size,
            orders: page.items.into_iter().map(OrderResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /order/create
///
/// POINT orders settle immediately (201). Card-involving orders park a
/// pending intent and return gateway auth parameters (202); the order record
/// appears only after the gateway callback reconciles.
#[utoipa::path(
    post,
    path = "/order/create",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created and settled", body = CreateOrderResponse),
        (status = 202, description = "Awaiting gateway authorization", body = CreateOrderResponse),
        (status = 400, description = "Validation failure or insufficient points"),
        (status = 401, description = "No session"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    payments: web::Data<PaymentService>,
    member: MemberId,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let payments = payments.get_ref().clone();
    let body = body.into_inner();

    let outcome = web::block(move || {
        payments.submit(
            member.0,
            SubmitOrder {
                product_name: body.product_name,
                product_price: body.product_price,
                quantity: body.quantity,
                payment_method: body.payment_method,
                point_amount: body.point_amount,
                provider: body.pg_provider,
            },
        )
    })
    .await
    .map_err(AppError::blocking)??;

    Ok(match outcome {
        SubmissionOutcome::Settled(order) => HttpResponse::Created().json(CreateOrderResponse {
            order_id: Some(order.id),
            order_number: order.order_number.clone(),
            status: order.status,
            message: "Order paid with points".into(),
            gateway: None,
        }),
        SubmissionOutcome::AwaitingGateway {
            order_number,
            params,
        } => HttpResponse::Accepted().json(CreateOrderResponse {
            order_id: None,
            order_number,
            status: OrderStatus::Pending,
            message: "Continue payment in the gateway window".into(),
            gateway: Some(params),
        }),
    })
}

/// GET /order/page
#[utoipa::path(
    get,
    path = "/order/page",
    params(
        ("page" = Option<i64>, Query, description = "Page number (0-based, default 0)"),
        ("size" = Option<i64>, Query, description = "Items per page (default 10, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated order list", body = ListOrdersResponse),
        (status = 401, description = "No session"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    orders: web::Data<OrderService>,
    member: MemberId,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let orders = orders.get_ref().clone();
    let params = query.into_inner();

    let page = web::block(move || orders.list_orders(member.0, params.page, params.size))
        .await
        .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse::from(page)))
}

/// GET /order/{id}
#[utoipa::path(
    get,
    path = "/order/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order detail", body = OrderResponse),
        (status = 403, description = "Order belongs to another member"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    orders: web::Data<OrderService>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let orders = orders.get_ref().clone();
    let order_id = path.into_inner();

    let order = web::block(move || orders.get_order(member.0, order_id))
        .await
        .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /order/{id}/cancel
#[utoipa::path(
    post,
    path = "/order/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already in a terminal cancelled state"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    orders: web::Data<OrderService>,
    member: MemberId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let orders = orders.get_ref().clone();
    let order_id = path.into_inner();

    let order = web::block(move || orders.cancel_order(member.0, order_id))
        .await
        .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
