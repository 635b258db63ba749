use axum::{ extract::State, Json };
use chrono::{ DateTime, Utc };
use serde::Serialize;
use uuid::Uuid;

use crate::db::{ crypto_address, portfolio, stock_holding, user_wallet };
use crate::error::Result;

use super::extract::UserPrincipal;
use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_balance: String,
    pub todays_pnl: String,
    pub total_profit_loss: String,
    pub win_rate: String,
    pub active_algorithms: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<portfolio::Model> for PortfolioResponse {
    fn from(portfolio: portfolio::Model) -> Self {
        Self {
            id: portfolio.id,
            user_id: portfolio.user_id,
            total_balance: portfolio.total_balance,
            todays_pnl: portfolio.todays_pnl,
            total_profit_loss: portfolio.total_profit_loss,
            win_rate: portfolio.win_rate,
            active_algorithms: portfolio.active_algorithms,
            updated_at: portfolio.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub id: Uuid,
    pub symbol: String,
    pub balance: String,
    pub usd_value: String,
    pub updated_at: DateTime<Utc>,
}

impl From<user_wallet::Model> for WalletResponse {
    fn from(wallet: user_wallet::Model) -> Self {
        Self {
            id: wallet.id,
            symbol: wallet.symbol,
            balance: wallet.balance,
            usd_value: wallet.usd_value,
            updated_at: wallet.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingResponse {
    pub id: Uuid,
    pub symbol: String,
    pub quantity: String,
    pub average_price: String,
    pub updated_at: DateTime<Utc>,
}

impl From<stock_holding::Model> for HoldingResponse {
    fn from(holding: stock_holding::Model) -> Self {
        Self {
            id: holding.id,
            symbol: holding.symbol,
            quantity: holding.quantity,
            average_price: holding.average_price,
            updated_at: holding.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAddressResponse {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub network: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<crypto_address::Model> for CryptoAddressResponse {
    fn from(address: crypto_address::Model) -> Self {
        Self {
            id: address.id,
            symbol: address.symbol,
            name: address.name,
            address: address.address,
            network: address.network,
            is_active: address.is_active,
            updated_at: address.updated_at,
        }
    }
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    principal: UserPrincipal
) -> Result<Json<PortfolioResponse>> {
    let portfolio = state.portfolio_service.get_portfolio(principal.user.id).await?;

    Ok(Json(portfolio.into()))
}

pub async fn get_wallets(
    State(state): State<AppState>,
    principal: UserPrincipal
) -> Result<Json<Vec<WalletResponse>>> {
    let wallets = state.portfolio_service.get_wallets(principal.user.id).await?;

    Ok(Json(wallets.into_iter().map(Into::into).collect()))
}

pub async fn get_holdings(
    State(state): State<AppState>,
    principal: UserPrincipal
) -> Result<Json<Vec<HoldingResponse>>> {
    let holdings = state.portfolio_service.get_holdings(principal.user.id).await?;

    Ok(Json(holdings.into_iter().map(Into::into).collect()))
}

/// Active receiving addresses shown on the deposit screen.
pub async fn get_crypto_addresses(
    State(state): State<AppState>,
    _principal: UserPrincipal
) -> Result<Json<Vec<CryptoAddressResponse>>> {
    let addresses = state.admin_service.active_addresses().await?;

    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}
