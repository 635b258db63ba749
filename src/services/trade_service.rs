use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{ trade, user, NewTrade, TradeRepository };
use crate::enums::{ AssetType, OrderType, TradeSide };
use crate::error::{ AppError, Result };
use crate::money;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceTradeRequest {
    pub symbol: Option<String>,
    pub asset_type: Option<String>,
    #[serde(alias = "type")]
    pub side: Option<String>,
    pub order_type: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
}

/// Order placement. Orders are accepted without buying-power or position checks;
/// those are settled when an administrator approves the order.
pub struct TradeService {
    trades: Arc<TradeRepository>,
}

impl TradeService {
    pub fn new(trades: Arc<TradeRepository>) -> Self {
        Self { trades }
    }

    pub async fn place_order(&self, user_id: Uuid, request: PlaceTradeRequest) -> Result<trade::Model> {
        let new_trade = validate_order(user_id, request)?;
        let trade = self.trades.create(new_trade).await?;

        tracing::info!(
            "User {} placed {} {} {} x {} (trade {})",
            user_id,
            trade.side,
            trade.symbol,
            trade.quantity,
            trade.price,
            trade.id
        );
        Ok(trade)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<trade::Model>> {
        self.trades.list_by_user(user_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<(trade::Model, Option<user::Model>)>> {
        self.trades.list_all_with_users().await
    }
}

fn validate_order(user_id: Uuid, request: PlaceTradeRequest) -> Result<NewTrade> {
    let symbol = request.symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingField("symbol"))?;
    let side: TradeSide = request.side.ok_or(AppError::MissingField("side"))?.parse()?;
    let quantity = money::require_positive(
        request.quantity.ok_or(AppError::MissingField("quantity"))?,
        "quantity"
    )?;
    let price = money::require_positive(
        request.price.ok_or(AppError::MissingField("price"))?,
        "price"
    )?;
    let asset_type = match request.asset_type {
        Some(value) => value.parse()?,
        None => AssetType::Stock,
    };
    let order_type = match request.order_type {
        Some(value) => value.parse()?,
        None => OrderType::Market,
    };

    Ok(NewTrade {
        user_id,
        symbol,
        asset_type,
        side,
        order_type,
        quantity,
        price,
    })
}
