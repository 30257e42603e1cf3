use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::payment_service::{CallbackOutcome, PaymentService};
use crate::domain::payment::{GatewayCallback, PgKind};
use crate::errors::AppError;

use super::auth::MemberId;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthParamsQuery {
    pub amount: i64,
    pub product_name: String,
    #[serde(default)]
    pub provider: PgKind,
}

/// Gateway redirect payload. Only the result code is trusted; everything
/// else is reconciled against the stored intent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub order_number: String,
    pub result_code: String,
    #[serde(default)]
    pub result_msg: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub tid: String,
}

impl From<CallbackRequest> for GatewayCallback {
    fn from(req: CallbackRequest) -> Self {
        GatewayCallback {
            order_number: req.order_number,
            result_code: req.result_code,
            result_msg: req.result_msg,
            auth_token: req.auth_token,
            tid: req.tid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: crate::domain::order::OrderStatus,
    pub message: String,
}

/// GET /pg/auth-params
#[utoipa::path(
    get,
    path = "/pg/auth-params",
    params(
        ("amount" = i64, Query, description = "Card amount to authorize"),
        ("productName" = String, Query, description = "Product name shown in the gateway window"),
        ("provider" = Option<String>, Query, description = "NICEPAY (default) or TOSSPAY"),
    ),
    responses(
        (status = 200, description = "Signed gateway parameters", body = crate::domain::payment::PgAuthParams),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "No session"),
    ),
    tag = "gateway"
)]
pub async fn auth_params(
    payments: web::Data<PaymentService>,
    member: MemberId,
    query: web::Query<AuthParamsQuery>,
) -> Result<HttpResponse, AppError> {
    let payments = payments.get_ref().clone();
    let q = query.into_inner();

    let params = web::block(move || {
        payments.preview_auth_params(member.0, q.amount, q.product_name, q.provider)
    })
    .await
    .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(params))
}

/// POST /pg/callback
///
/// Server-to-server redirect from the gateway. Unauthenticated: the member
/// identity comes from the stored intent, not from the caller.
#[utoipa::path(
    post,
    path = "/pg/callback",
    request_body = CallbackRequest,
    responses(
        (status = 200, description = "Payment settled (or duplicate redelivery)", body = CallbackResponse),
        (status = 402, description = "Gateway declined the authorization"),
        (status = 410, description = "No live intent for the order number"),
        (status = 500, description = "Reconciliation incident; manual follow-up required"),
    ),
    tag = "gateway"
)]
pub async fn callback(
    payments: web::Data<PaymentService>,
    body: web::Json<CallbackRequest>,
) -> Result<HttpResponse, AppError> {
    let payments = payments.get_ref().clone();
    let cb: GatewayCallback = body.into_inner().into();

    let outcome = web::block(move || payments.handle_callback(cb))
        .await
        .map_err(AppError::blocking)??;

    let (order, message) = match outcome {
        CallbackOutcome::Settled(order) => (order, "Payment settled"),
        CallbackOutcome::Duplicate(order) => (order, "Already processed"),
    };

    Ok(HttpResponse::Ok().json(CallbackResponse {
        order_id: order.id,
        order_number: order.order_number.clone(),
        status: order.status,
        message: message.into(),
    }))
}
