use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::point_service::PointService;
use crate::domain::point::{PointEntry, PointEntryKind};
use crate::errors::AppError;

use super::auth::MemberId;

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointMutationRequest {
    pub amount: i64,
    /// Order the mutation belongs to. Repeating the same (order, operation)
    /// pair is a no-op.
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointMutationResponse {
    pub success: bool,
    pub remaining_balance: i64,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointHistoryEntry {
    pub order_id: Uuid,
    pub entry_type: PointEntryKind,
    pub amount: i64,
    pub balance_after: i64,
    pub created_at: String,
}

impl From<PointEntry> for PointHistoryEntry {
    fn from(e: PointEntry) -> Self {
        PointHistoryEntry {
            order_id: e.order_id,
            entry_type: e.kind,
            amount: e.amount,
            balance_after: e.balance_after,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// GET /point/balance
#[utoipa::path(
    get,
    path = "/point/balance",
    responses(
        (status = 200, description = "Current point balance", body = BalanceResponse),
        (status = 401, description = "No session"),
    ),
    tag = "points"
)]
pub async fn balance(
    points: web::Data<PointService>,
    member: MemberId,
) -> Result<HttpResponse, AppError> {
    let points = points.get_ref().clone();

    let balance = web::block(move || points.balance(member.0))
        .await
        .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(BalanceResponse { balance }))
}

/// POST /point/deduct
#[utoipa::path(
    post,
    path = "/point/deduct",
    request_body = PointMutationRequest,
    responses(
        (status = 200, description = "Points deducted", body = PointMutationResponse),
        (status = 400, description = "Non-positive amount or insufficient balance"),
        (status = 401, description = "No session"),
    ),
    tag = "points"
)]
pub async fn deduct(
    points: web::Data<PointService>,
    member: MemberId,
    body: web::Json<PointMutationRequest>,
) -> Result<HttpResponse, AppError> {
    let points = points.get_ref().clone();
    let req = body.into_inner();

    let remaining = web::block(move || points.deduct(member.0, req.amount, req.order_id))
        .await
        .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(PointMutationResponse {
        success: true,
        remaining_balance: remaining,
        message: "Points deducted".into(),
    }))
}

/// POST /point/refund
#[utoipa::path(
    post,
    path = "/point/refund",
    request_body = PointMutationRequest,
    responses(
        (status = 200, description = "Points refunded", body = PointMutationResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "No session"),
    ),
    tag = "points"
)]
pub async fn refund(
    points: web::Data<PointService>,
    member: MemberId,
    body: web::Json<PointMutationRequest>,
) -> Result<HttpResponse, AppError> {
    let points = points.get_ref().clone();
    let req = body.into_inner();

    let remaining = web::block(move || points.refund(member.0, req.amount, req.order_id))
        .await
        .map_err(AppError::blocking)??;

    Ok(HttpResponse::Ok().json(PointMutationResponse {
        success: true,
        remaining_balance: remaining,
        message: "Points refunded".into(),
    }))
}

/// GET /point/history
#[utoipa::path(
    get,
    path = "/point/history",
    responses(
        (status = 200, description = "Point mutations, newest first", body = [PointHistoryEntry]),
        (status = 401, description = "No session"),
    ),
    tag = "points"
)]
pub async fn history(
    points: web::Data<PointService>,
    member: MemberId,
) -> Result<HttpResponse, AppError> {
    let points = points.get_ref().clone();

    let entries = web::block(move || points.history(member.0))
        .await
        .map_err(AppError::blocking)??;

    let entries: Vec<PointHistoryEntry> =
        entries.into_iter().map(PointHistoryEntry::from).collect();
    Ok(HttpResponse::Ok().json(entries))
}
