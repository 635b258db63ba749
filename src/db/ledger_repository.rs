use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict,
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{
    portfolio,
    stock_holding,
    user_wallet,
    Portfolio,
    StockHolding,
    UserWallet,
};
use crate::db::supports_row_locks;
use crate::enums::TradeSide;
use crate::error::{ AppError, Result };
use crate::money;

pub const STARTING_BALANCE: &str = "0";
pub const STARTING_WIN_RATE: &str = "0";

/// Ledger store: portfolio aggregates, per-asset wallets and stock holdings.
///
/// Reads go through `&self`. Mutations are associated functions taking any
/// connection so that callers can run them inside a transaction together with
/// the state change that caused them.
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_portfolio(&self, user_id: Uuid) -> Result<Option<portfolio::Model>> {
        let portfolio = Portfolio::find()
            .filter(portfolio::Column::UserId.eq(user_id))
            .one(&self.db).await?;

        Ok(portfolio)
    }

    /// Fetch the user's portfolio, creating it with starting values on first access.
    pub async fn get_or_create_portfolio(&self, user_id: Uuid) -> Result<portfolio::Model> {
        if let Some(portfolio) = self.find_portfolio(user_id).await? {
            return Ok(portfolio);
        }

        let portfolio = portfolio::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            total_balance: Set(STARTING_BALANCE.to_string()),
            todays_pnl: Set("0".to_string()),
            total_profit_loss: Set("0".to_string()),
            win_rate: Set(STARTING_WIN_RATE.to_string()),
            active_algorithms: Set(0),
            updated_at: Set(chrono::Utc::now()),
        };

        // A concurrent first access may have created the row already
        Portfolio::insert(portfolio)
            .on_conflict(OnConflict::column(portfolio::Column::UserId).do_nothing().to_owned())
            .exec_without_returning(&self.db).await?;

        self.find_portfolio(user_id).await?.ok_or_else(||
            AppError::Internal(format!("Portfolio for user {} vanished after insert", user_id))
        )
    }

    pub async fn list_portfolios(&self) -> Result<Vec<portfolio::Model>> {
        Ok(Portfolio::find().all(&self.db).await?)
    }

    pub async fn wallets_for_user(&self, user_id: Uuid) -> Result<Vec<user_wallet::Model>> {
        let wallets = UserWallet::find()
            .filter(user_wallet::Column::UserId.eq(user_id))
            .order_by_asc(user_wallet::Column::Symbol)
            .all(&self.db).await?;

        Ok(wallets)
    }

    pub async fn holdings_for_user(&self, user_id: Uuid) -> Result<Vec<stock_holding::Model>> {
        let holdings = StockHolding::find()
            .filter(stock_holding::Column::UserId.eq(user_id))
            .order_by_asc(stock_holding::Column::Symbol)
            .all(&self.db).await?;

        Ok(holdings)
    }

    /// Portfolio row read for a subsequent write; locked where the backend allows.
    pub async fn portfolio_for_update<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid
    ) -> Result<Option<portfolio::Model>> {
        let mut query = Portfolio::find().filter(portfolio::Column::UserId.eq(user_id));
        if supports_row_locks(conn) {
            query = query.lock_exclusive();
        }

        Ok(query.one(conn).await?)
    }

    pub async fn save_portfolio_totals<C: ConnectionTrait>(
        conn: &C,
        portfolio: portfolio::Model,
        total_balance: Decimal,
        total_profit_loss: Decimal
    ) -> Result<portfolio::Model> {
        let mut active: portfolio::ActiveModel = portfolio.into();
        active.total_balance = Set(money::to_stored(total_balance));
        active.total_profit_loss = Set(money::to_stored(total_profit_loss));
        active.updated_at = Set(chrono::Utc::now());

        Ok(active.update(conn).await?)
    }

    async fn wallet_for_update<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        symbol: &str
    ) -> Result<Option<user_wallet::Model>> {
        let mut query = UserWallet::find()
            .filter(user_wallet::Column::UserId.eq(user_id))
            .filter(user_wallet::Column::Symbol.eq(symbol));
        if supports_row_locks(conn) {
            query = query.lock_exclusive();
        }

        Ok(query.one(conn).await?)
    }

    /// Add a confirmed deposit to the user's wallet for `symbol`.
    pub async fn credit_wallet<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        symbol: &str,
        amount: Decimal,
        usd_value: Decimal
    ) -> Result<user_wallet::Model> {
        let now = chrono::Utc::now();

        match Self::wallet_for_update(conn, user_id, symbol).await? {
            Some(wallet) => {
                let balance = money::add(money::parse_stored(&wallet.balance)?, amount)?;
                let usd = money::add(money::parse_stored(&wallet.usd_value)?, usd_value)?;

                let mut active: user_wallet::ActiveModel = wallet.into();
                active.balance = Set(money::to_stored(balance));
                active.usd_value = Set(money::to_stored(usd));
                active.updated_at = Set(now);

                Ok(active.update(conn).await?)
            }
            None => {
                let wallet = user_wallet::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    symbol: Set(symbol.to_string()),
                    balance: Set(money::to_stored(amount)),
                    usd_value: Set(money::to_stored(usd_value)),
                    updated_at: Set(now),
                };

                Ok(wallet.insert(conn).await?)
            }
        }
    }

    /// Move a crypto wallet by an approved order. The USD value is re-marked at the fill price.
    pub async fn apply_crypto_fill<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        symbol: &str,
        side: TradeSide,
        quantity: Decimal,
        price: Decimal
    ) -> Result<user_wallet::Model> {
        let existing = Self::wallet_for_update(conn, user_id, symbol).await?;
        let held = match &existing {
            Some(wallet) => money::parse_stored(&wallet.balance)?,
            None => Decimal::ZERO,
        };

        let balance = match side {
            TradeSide::Buy => money::add(held, quantity)?,
            TradeSide::Sell => {
                if held < quantity {
                    return Err(AppError::InsufficientHoldings(symbol.to_string()));
                }
                money::sub(held, quantity)?
            }
        };
        let usd_value = money::mul(balance, price)?;
        let now = chrono::Utc::now();

        match existing {
            Some(wallet) => {
                let mut active: user_wallet::ActiveModel = wallet.into();
                active.balance = Set(money::to_stored(balance));
                active.usd_value = Set(money::to_stored(usd_value));
                active.updated_at = Set(now);

                Ok(active.update(conn).await?)
            }
            None => {
                let wallet = user_wallet::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    symbol: Set(symbol.to_string()),
                    balance: Set(money::to_stored(balance)),
                    usd_value: Set(money::to_stored(usd_value)),
                    updated_at: Set(now),
                };

                Ok(wallet.insert(conn).await?)
            }
        }
    }

    /// Move a stock position by an approved order. Buys re-average the cost basis.
    pub async fn apply_stock_fill<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        symbol: &str,
        side: TradeSide,
        quantity: Decimal,
        price: Decimal
    ) -> Result<stock_holding::Model> {
        let mut query = StockHolding::find()
            .filter(stock_holding::Column::UserId.eq(user_id))
            .filter(stock_holding::Column::Symbol.eq(symbol));
        if supports_row_locks(conn) {
            query = query.lock_exclusive();
        }
        let existing = query.one(conn).await?;

        let (held, average) = match &existing {
            Some(holding) =>
                (
                    money::parse_stored(&holding.quantity)?,
                    money::parse_stored(&holding.average_price)?,
                ),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        let (quantity_after, average_after) = match side {
            TradeSide::Buy => {
                let total = money::add(held, quantity)?;
                let cost = money::add(money::mul(held, average)?, money::mul(quantity, price)?)?;
                (total, money::div(cost, total)?)
            }
            TradeSide::Sell => {
                if held < quantity {
                    return Err(AppError::InsufficientHoldings(symbol.to_string()));
                }
                (money::sub(held, quantity)?, average)
            }
        };
        let now = chrono::Utc::now();

        match existing {
            Some(holding) => {
                let mut active: stock_holding::ActiveModel = holding.into();
                active.quantity = Set(money::to_stored(quantity_after));
                active.average_price = Set(money::to_stored(average_after));
                active.updated_at = Set(now);

                Ok(active.update(conn).await?)
            }
            None => {
                let holding = stock_holding::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    symbol: Set(symbol.to_string()),
                    quantity: Set(money::to_stored(quantity_after)),
                    average_price: Set(money::to_stored(average_after)),
                    updated_at: Set(now),
                };

                Ok(holding.insert(conn).await?)
            }
        }
    }
}
