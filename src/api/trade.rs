use axum::{ extract::State, http::StatusCode, Json };
use chrono::{ DateTime, Utc };
use serde::Serialize;
use uuid::Uuid;

use crate::db::{ trade, user };
use crate::error::Result;
use crate::services::trade_service::PlaceTradeRequest;

use super::extract::{ JsonBody, UserPrincipal };
use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symbol: String,
    pub asset_type: String,
    pub side: String,
    pub order_type: String,
    pub quantity: String,
    pub price: String,
    pub total_amount: String,
    pub status: String,
    pub admin_approval: String,
    pub profit_loss: Option<String>,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<trade::Model> for TradeResponse {
    fn from(trade: trade::Model) -> Self {
        Self {
            id: trade.id,
            user_id: trade.user_id,
            symbol: trade.symbol,
            asset_type: trade.asset_type,
            side: trade.side,
            order_type: trade.order_type,
            quantity: trade.quantity,
            price: trade.price,
            total_amount: trade.total_amount,
            status: trade.status,
            admin_approval: trade.admin_approval,
            profit_loss: trade.profit_loss,
            rejection_reason: trade.rejection_reason,
            notes: trade.notes,
            approved_by: trade.approved_by,
            approved_at: trade.approved_at,
            closed_at: trade.closed_at,
            created_at: trade.created_at,
        }
    }
}

/// Trade as listed in the back office, with its owner.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTradeResponse {
    #[serde(flatten)]
    pub trade: TradeResponse,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl From<(trade::Model, Option<user::Model>)> for AdminTradeResponse {
    fn from((trade, owner): (trade::Model, Option<user::Model>)) -> Self {
        let (username, email) = match owner {
            Some(owner) => (Some(owner.username), Some(owner.email)),
            None => (None, None),
        };

        Self {
            trade: trade.into(),
            username,
            email,
        }
    }
}

pub async fn list_trades(
    State(state): State<AppState>,
    principal: UserPrincipal
) -> Result<Json<Vec<TradeResponse>>> {
    let trades = state.trade_service.list_for_user(principal.user.id).await?;

    Ok(Json(trades.into_iter().map(Into::into).collect()))
}

pub async fn place_trade(
    State(state): State<AppState>,
    principal: UserPrincipal,
    JsonBody(request): JsonBody<PlaceTradeRequest>
) -> Result<(StatusCode, Json<TradeResponse>)> {
    let trade = state.trade_service.place_order(principal.user.id, request).await?;

    Ok((StatusCode::CREATED, Json(trade.into())))
}
