use axum::{ extract::{ Path, Query, State }, http::StatusCode, Json };
use chrono::{ DateTime, Utc };
use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };
use serde_json::json;
use uuid::Uuid;

use crate::db::{ admin_log, website_setting };
use crate::enums::ApprovalStatus;
use crate::error::{ AppError, Result };
use crate::money;
use crate::services::admin_service::{
    AdminStats,
    CreateCryptoAddressRequest,
    UpdateCryptoAddressRequest,
    UpdateSettingRequest,
    UserPortfolioView,
    UserStatusRequest,
};
use crate::services::approval_service::{ BulkApprovalResult, BulkOutcome, RejectRequest };
use crate::services::balance_service::AdjustBalanceRequest;

use super::auth::UserResponse;
use super::deposit::{ AdminDepositResponse, DepositResponse };
use super::extract::{ AdminPrincipal, JsonBody, RequestMeta };
use super::portfolio::{ CryptoAddressResponse, HoldingResponse, PortfolioResponse, WalletResponse };
use super::trade::{ AdminTradeResponse, TradeResponse };
use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotesRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossRequest {
    pub profit_loss: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveRequest {
    pub trade_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct DepositFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub total_balance: Option<String>,
    pub total_profit_loss: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPortfolioResponse {
    pub user: UserResponse,
    pub portfolio: PortfolioResponse,
    pub wallets: Vec<WalletResponse>,
    pub holdings: Vec<HoldingResponse>,
    pub trades: Vec<TradeResponse>,
}

impl From<UserPortfolioView> for UserPortfolioResponse {
    fn from(view: UserPortfolioView) -> Self {
        Self {
            user: view.user.into(),
            portfolio: view.portfolio.into(),
            wallets: view.wallets.into_iter().map(Into::into).collect(),
            holdings: view.holdings.into_iter().map(Into::into).collect(),
            trades: view.trades.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveResponse {
    pub approved: usize,
    pub results: Vec<BulkApprovalResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingResponse {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub category: String,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<website_setting::Model> for SettingResponse {
    fn from(setting: website_setting::Model) -> Self {
        Self {
            id: setting.id,
            key: setting.key,
            value: setting.value,
            category: setting.category,
            updated_by: setting.updated_by,
            updated_at: setting.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogResponse {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<admin_log::Model> for AdminLogResponse {
    fn from(log: admin_log::Model) -> Self {
        Self {
            id: log.id,
            admin_id: log.admin_id,
            action: log.action,
            resource: log.resource,
            resource_id: log.resource_id,
            details: log.details,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            created_at: log.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub active_users: u64,
    pub pending_trades: u64,
    pub pending_deposits: u64,
    pub total_balance: String,
}

impl From<AdminStats> for StatsResponse {
    fn from(stats: AdminStats) -> Self {
        Self {
            total_users: stats.total_users,
            active_users: stats.active_users,
            pending_trades: stats.pending_trades,
            pending_deposits: stats.pending_deposits,
            total_balance: money::to_stored(stats.total_balance),
        }
    }
}

// ─── Users ──────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminPrincipal
) -> Result<Json<Vec<AdminUserResponse>>> {
    let users = state.admin_service.list_users().await?;

    let rows = users
        .into_iter()
        .map(|(user, portfolio)| {
            let (total_balance, total_profit_loss) = match portfolio {
                Some(p) => (Some(p.total_balance), Some(p.total_profit_loss)),
                None => (None, None),
            };
            AdminUserResponse {
                user: user.into(),
                total_balance,
                total_profit_loss,
            }
        })
        .collect();

    Ok(Json(rows))
}

pub async fn set_user_status(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<UserStatusRequest>
) -> Result<Json<UserResponse>> {
    let user = state.admin_service.set_user_status(user_id, request, &admin.actor(&meta)).await?;

    Ok(Json(user.into()))
}

pub async fn adjust_balance(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<AdjustBalanceRequest>
) -> Result<Json<PortfolioResponse>> {
    let portfolio = state.balance_service.adjust_balance(
        user_id,
        request,
        &admin.actor(&meta)
    ).await?;

    Ok(Json(portfolio.into()))
}

pub async fn user_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    _admin: AdminPrincipal
) -> Result<Json<UserPortfolioResponse>> {
    let view = state.admin_service.user_portfolio(user_id).await?;

    Ok(Json(view.into()))
}

// ─── Trades ─────────────────────────────────────────────────────────

pub async fn list_trades(
    State(state): State<AppState>,
    _admin: AdminPrincipal
) -> Result<Json<Vec<AdminTradeResponse>>> {
    let trades = state.trade_service.list_all().await?;

    Ok(Json(trades.into_iter().map(Into::into).collect()))
}

pub async fn approve_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    body: Option<JsonBody<NotesRequest>>
) -> Result<Json<TradeResponse>> {
    let JsonBody(request) = body.unwrap_or_default();
    let trade = state.approval_service.approve_trade(
        trade_id,
        &admin.actor(&meta),
        request.notes
    ).await?;

    Ok(Json(trade.into()))
}

pub async fn reject_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    body: Option<JsonBody<RejectRequest>>
) -> Result<Json<TradeResponse>> {
    let JsonBody(request) = body.unwrap_or_default();
    let trade = state.approval_service.reject_trade(trade_id, &admin.actor(&meta), request).await?;

    Ok(Json(trade.into()))
}

pub async fn close_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    body: Option<JsonBody<ProfitLossRequest>>
) -> Result<Json<TradeResponse>> {
    let JsonBody(request) = body.unwrap_or_default();
    let trade = state.approval_service.close_trade(
        trade_id,
        &admin.actor(&meta),
        request.profit_loss
    ).await?;

    Ok(Json(trade.into()))
}

pub async fn set_trade_profit_loss(
    State(state): State<AppState>,
    Path(trade_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<ProfitLossRequest>
) -> Result<Json<TradeResponse>> {
    let profit_loss = request.profit_loss.ok_or(AppError::MissingField("profitLoss"))?;
    let trade = state.approval_service.set_trade_profit_loss(
        trade_id,
        &admin.actor(&meta),
        profit_loss
    ).await?;

    Ok(Json(trade.into()))
}

pub async fn bulk_approve_trades(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<BulkApproveRequest>
) -> Result<Json<BulkApproveResponse>> {
    let trade_ids = request.trade_ids.ok_or(AppError::MissingField("tradeIds"))?;
    let results = state.approval_service.bulk_approve_trades(
        user_id,
        trade_ids,
        &admin.actor(&meta)
    ).await?;

    let approved = results
        .iter()
        .filter(|r| r.outcome == BulkOutcome::Approved)
        .count();

    Ok(Json(BulkApproveResponse { approved, results }))
}

// ─── Deposits ───────────────────────────────────────────────────────

pub async fn list_deposits(
    State(state): State<AppState>,
    _admin: AdminPrincipal,
    Query(filter): Query<DepositFilter>
) -> Result<Json<Vec<AdminDepositResponse>>> {
    let status = match filter.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(value) => Some(value.parse::<ApprovalStatus>()?),
    };
    let deposits = state.deposit_service.list_all(status).await?;

    Ok(Json(deposits.into_iter().map(Into::into).collect()))
}

pub async fn approve_deposit(
    State(state): State<AppState>,
    Path(deposit_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    body: Option<JsonBody<NotesRequest>>
) -> Result<Json<DepositResponse>> {
    let JsonBody(request) = body.unwrap_or_default();
    let deposit = state.approval_service.approve_deposit(
        deposit_id,
        &admin.actor(&meta),
        request.notes
    ).await?;

    Ok(Json(deposit.into()))
}

pub async fn reject_deposit(
    State(state): State<AppState>,
    Path(deposit_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    body: Option<JsonBody<RejectRequest>>
) -> Result<Json<DepositResponse>> {
    let JsonBody(request) = body.unwrap_or_default();
    let deposit = state.approval_service.reject_deposit(
        deposit_id,
        &admin.actor(&meta),
        request
    ).await?;

    Ok(Json(deposit.into()))
}

// ─── Crypto addresses ───────────────────────────────────────────────

pub async fn list_crypto_addresses(
    State(state): State<AppState>,
    _admin: AdminPrincipal
) -> Result<Json<Vec<CryptoAddressResponse>>> {
    let addresses = state.admin_service.list_addresses().await?;

    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}

pub async fn create_crypto_address(
    State(state): State<AppState>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<CreateCryptoAddressRequest>
) -> Result<(StatusCode, Json<CryptoAddressResponse>)> {
    let address = state.admin_service.create_address(request, &admin.actor(&meta)).await?;

    Ok((StatusCode::CREATED, Json(address.into())))
}

pub async fn update_crypto_address(
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<UpdateCryptoAddressRequest>
) -> Result<Json<CryptoAddressResponse>> {
    let address = state.admin_service.update_address(
        address_id,
        request,
        &admin.actor(&meta)
    ).await?;

    Ok(Json(address.into()))
}

pub async fn delete_crypto_address(
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
    admin: AdminPrincipal,
    meta: RequestMeta
) -> Result<Json<serde_json::Value>> {
    state.admin_service.delete_address(address_id, &admin.actor(&meta)).await?;

    Ok(Json(json!({ "message": "Crypto address deleted" })))
}

// ─── Settings, audit, stats ─────────────────────────────────────────

pub async fn list_settings(
    State(state): State<AppState>,
    _admin: AdminPrincipal
) -> Result<Json<Vec<SettingResponse>>> {
    let settings = state.admin_service.list_settings().await?;

    Ok(Json(settings.into_iter().map(Into::into).collect()))
}

pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    admin: AdminPrincipal,
    meta: RequestMeta,
    JsonBody(request): JsonBody<UpdateSettingRequest>
) -> Result<Json<SettingResponse>> {
    let setting = state.admin_service.update_setting(&key, request, &admin.actor(&meta)).await?;

    Ok(Json(setting.into()))
}

pub async fn list_logs(
    State(state): State<AppState>,
    _admin: AdminPrincipal,
    Query(query): Query<LogsQuery>
) -> Result<Json<Vec<AdminLogResponse>>> {
    let logs = state.admin_service.recent_logs(query.limit).await?;

    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminPrincipal
) -> Result<Json<StatsResponse>> {
    let stats = state.admin_service.stats().await?;

    Ok(Json(stats.into()))
}
