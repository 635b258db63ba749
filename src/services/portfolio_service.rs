use std::sync::Arc;

use uuid::Uuid;

use crate::db::{ portfolio, stock_holding, user_wallet, LedgerRepository };
use crate::error::Result;

/// Read side of the ledger for a single user.
pub struct PortfolioService {
    ledger: Arc<LedgerRepository>,
}

impl PortfolioService {
    pub fn new(ledger: Arc<LedgerRepository>) -> Self {
        Self { ledger }
    }

    /// Get the user's portfolio, creating it on first access.
    pub async fn get_portfolio(&self, user_id: Uuid) -> Result<portfolio::Model> {
        self.ledger.get_or_create_portfolio(user_id).await
    }

    pub async fn get_wallets(&self, user_id: Uuid) -> Result<Vec<user_wallet::Model>> {
        self.ledger.wallets_for_user(user_id).await
    }

    pub async fn get_holdings(&self, user_id: Uuid) -> Result<Vec<stock_holding::Model>> {
        self.ledger.holdings_for_user(user_id).await
    }
}
