use rust_decimal::Decimal;
use sea_orm::{ ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait };
use serde::{ Deserialize, Serialize };
use serde_json::json;
use uuid::Uuid;

use crate::db::{
    deposit_request,
    trade,
    AdminLogRepository,
    DepositRepository,
    LedgerRepository,
    TradeRepository,
};
use crate::enums::{ ApprovalStatus, AssetType, TradeSide, TradeStatus };
use crate::error::{ AppError, Result };
use crate::money;
use crate::services::audit::AdminActor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOutcome {
    Approved,
    NotFound,
    NotPending,
    Error,
}

/// Per-trade result of a bulk approval.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkApprovalResult {
    pub id: Uuid,
    pub outcome: BulkOutcome,
    /// Error code of the failure, as in the `{"error": {"code"}}` body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BulkApprovalResult {
    fn new(id: Uuid, outcome: BulkOutcome, error: Option<&AppError>) -> Self {
        let detail = error.map(|e| e.to_error_response().error);
        Self {
            id,
            outcome,
            code: detail.as_ref().map(|d| d.code.clone()),
            message: detail.map(|d| d.message),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
}

/// Moves trades and deposit requests out of `pending` and applies their ledger effect.
///
/// Each decision runs in one transaction together with its ledger mutation and
/// audit entry, so a record is either decided with all its effects or left pending.
pub struct ApprovalService {
    db: DatabaseConnection,
}

impl ApprovalService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn approve_trade(
        &self,
        trade_id: Uuid,
        actor: &AdminActor,
        notes: Option<String>
    ) -> Result<trade::Model> {
        let txn = self.db.begin().await?;

        let trade = TradeRepository::find_for_update(&txn, trade_id).await?.ok_or_else(|| {
            AppError::NotFound("Trade not found".to_string())
        })?;
        let trade = approve_trade_in(&txn, trade, actor, notes).await?;

        txn.commit().await?;

        tracing::info!("Admin {} approved trade {}", actor.admin_id, trade.id);
        Ok(trade)
    }

    /// Approve each listed trade of `user_id` independently. Ids that are unknown or
    /// belong to someone else are reported as `notFound` and left untouched.
    pub async fn bulk_approve_trades(
        &self,
        user_id: Uuid,
        trade_ids: Vec<Uuid>,
        actor: &AdminActor
    ) -> Result<Vec<BulkApprovalResult>> {
        let mut results = Vec::with_capacity(trade_ids.len());

        for trade_id in trade_ids {
            let result = match self.approve_owned_trade(user_id, trade_id, actor).await {
                Ok(_) => BulkApprovalResult::new(trade_id, BulkOutcome::Approved, None),
                Err(e) => {
                    let outcome = match &e {
                        AppError::NotFound(_) => BulkOutcome::NotFound,
                        AppError::InvalidState(_) => BulkOutcome::NotPending,
                        _ => {
                            tracing::warn!("Bulk approval of trade {} failed: {}", trade_id, e);
                            BulkOutcome::Error
                        }
                    };
                    BulkApprovalResult::new(trade_id, outcome, Some(&e))
                }
            };

            results.push(result);
        }

        let approved = results
            .iter()
            .filter(|r| r.outcome == BulkOutcome::Approved)
            .count();
        tracing::info!(
            "Admin {} bulk-approved {}/{} trades for user {}",
            actor.admin_id,
            approved,
            results.len(),
            user_id
        );

        Ok(results)
    }

    async fn approve_owned_trade(
        &self,
        user_id: Uuid,
        trade_id: Uuid,
        actor: &AdminActor
    ) -> Result<trade::Model> {
        let txn = self.db.begin().await?;

        let trade = TradeRepository::find_for_update(&txn, trade_id).await?
            .filter(|trade| trade.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Trade not found for this user".to_string()))?;
        let trade = approve_trade_in(&txn, trade, actor, None).await?;

        txn.commit().await?;
        Ok(trade)
    }

    pub async fn reject_trade(
        &self,
        trade_id: Uuid,
        actor: &AdminActor,
        request: RejectRequest
    ) -> Result<trade::Model> {
        let reason = required_reason(request.rejection_reason)?;
        let txn = self.db.begin().await?;

        let trade = TradeRepository::find_for_update(&txn, trade_id).await?.ok_or_else(|| {
            AppError::NotFound("Trade not found".to_string())
        })?;
        let current: ApprovalStatus = trade.admin_approval.parse()?;
        current.transition(ApprovalStatus::Rejected)?;

        let mut active: trade::ActiveModel = trade.into();
        active.status = Set(TradeStatus::Rejected.to_string());
        active.admin_approval = Set(ApprovalStatus::Rejected.to_string());
        active.rejection_reason = Set(Some(reason.clone()));
        active.notes = Set(request.notes);
        active.approved_by = Set(Some(actor.admin_id));
        let trade = active.update(&txn).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "reject_trade",
                "trade",
                Some(trade.id.to_string()),
                json!({ "symbol": trade.symbol, "reason": reason })
            )
        ).await?;

        txn.commit().await?;

        tracing::info!("Admin {} rejected trade {}", actor.admin_id, trade.id);
        Ok(trade)
    }

    /// Close an approved trade, optionally recording its realized P&L.
    pub async fn close_trade(
        &self,
        trade_id: Uuid,
        actor: &AdminActor,
        profit_loss: Option<Decimal>
    ) -> Result<trade::Model> {
        let txn = self.db.begin().await?;

        let trade = TradeRepository::find_for_update(&txn, trade_id).await?.ok_or_else(|| {
            AppError::NotFound("Trade not found".to_string())
        })?;
        let status: TradeStatus = trade.status.parse()?;
        if !matches!(status, TradeStatus::Approved | TradeStatus::Executed) {
            return Err(AppError::InvalidState(format!("Cannot close a trade that is {}", status)));
        }

        let mut active: trade::ActiveModel = trade.into();
        active.status = Set(TradeStatus::Closed.to_string());
        active.closed_at = Set(Some(chrono::Utc::now()));
        if let Some(profit_loss) = profit_loss {
            active.profit_loss = Set(Some(money::to_stored(profit_loss)));
        }
        let trade = active.update(&txn).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "close_trade",
                "trade",
                Some(trade.id.to_string()),
                json!({ "symbol": trade.symbol, "profitLoss": trade.profit_loss })
            )
        ).await?;

        txn.commit().await?;
        Ok(trade)
    }

    pub async fn set_trade_profit_loss(
        &self,
        trade_id: Uuid,
        actor: &AdminActor,
        profit_loss: Decimal
    ) -> Result<trade::Model> {
        let txn = self.db.begin().await?;

        let trade = TradeRepository::find_for_update(&txn, trade_id).await?.ok_or_else(|| {
            AppError::NotFound("Trade not found".to_string())
        })?;
        let previous = trade.profit_loss.clone();

        let mut active: trade::ActiveModel = trade.into();
        active.profit_loss = Set(Some(money::to_stored(profit_loss)));
        let trade = active.update(&txn).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "update_trade_pnl",
                "trade",
                Some(trade.id.to_string()),
                json!({ "previous": previous, "profitLoss": trade.profit_loss })
            )
        ).await?;

        txn.commit().await?;
        Ok(trade)
    }

    /// Approve a deposit and credit the deposited asset to the user's wallet.
    pub async fn approve_deposit(
        &self,
        deposit_id: Uuid,
        actor: &AdminActor,
        notes: Option<String>
    ) -> Result<deposit_request::Model> {
        let txn = self.db.begin().await?;

        let deposit = DepositRepository::find_for_update(&txn, deposit_id).await?.ok_or_else(|| {
            AppError::NotFound("Deposit request not found".to_string())
        })?;
        let current: ApprovalStatus = deposit.status.parse()?;
        current.transition(ApprovalStatus::Approved)?;

        let amount = money::parse_stored(&deposit.amount)?;
        let usd_value = money::parse_stored(&deposit.usd_value)?;
        LedgerRepository::credit_wallet(
            &txn,
            deposit.user_id,
            &deposit.crypto_type,
            amount,
            usd_value
        ).await?;

        let mut active: deposit_request::ActiveModel = deposit.into();
        active.status = Set(ApprovalStatus::Approved.to_string());
        active.approved_by = Set(Some(actor.admin_id));
        active.approved_at = Set(Some(chrono::Utc::now()));
        if notes.is_some() {
            active.notes = Set(notes);
        }
        let deposit = active.update(&txn).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "approve_deposit",
                "deposit_request",
                Some(deposit.id.to_string()),
                json!({
                    "cryptoType": deposit.crypto_type,
                    "amount": deposit.amount,
                    "usdValue": deposit.usd_value,
                })
            )
        ).await?;

        txn.commit().await?;

        tracing::info!(
            "Admin {} approved deposit {} ({} {})",
            actor.admin_id,
            deposit.id,
            deposit.amount,
            deposit.crypto_type
        );
        Ok(deposit)
    }

    pub async fn reject_deposit(
        &self,
        deposit_id: Uuid,
        actor: &AdminActor,
        request: RejectRequest
    ) -> Result<deposit_request::Model> {
        let reason = required_reason(request.rejection_reason)?;
        let txn = self.db.begin().await?;

        let deposit = DepositRepository::find_for_update(&txn, deposit_id).await?.ok_or_else(|| {
            AppError::NotFound("Deposit request not found".to_string())
        })?;
        let current: ApprovalStatus = deposit.status.parse()?;
        current.transition(ApprovalStatus::Rejected)?;

        let mut active: deposit_request::ActiveModel = deposit.into();
        active.status = Set(ApprovalStatus::Rejected.to_string());
        active.rejection_reason = Set(Some(reason.clone()));
        active.notes = Set(request.notes);
        active.approved_by = Set(Some(actor.admin_id));
        let deposit = active.update(&txn).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "reject_deposit",
                "deposit_request",
                Some(deposit.id.to_string()),
                json!({ "cryptoType": deposit.crypto_type, "reason": reason })
            )
        ).await?;

        txn.commit().await?;

        tracing::info!("Admin {} rejected deposit {}", actor.admin_id, deposit.id);
        Ok(deposit)
    }
}

/// Approval of a pending trade: flip both state fields, then move the position.
async fn approve_trade_in<C: ConnectionTrait>(
    conn: &C,
    trade: trade::Model,
    actor: &AdminActor,
    notes: Option<String>
) -> Result<trade::Model> {
    let current: ApprovalStatus = trade.admin_approval.parse()?;
    current.transition(ApprovalStatus::Approved)?;

    let asset_type: AssetType = trade.asset_type.parse()?;
    let side: TradeSide = trade.side.parse()?;
    let quantity = money::parse_stored(&trade.quantity)?;
    let price = money::parse_stored(&trade.price)?;

    match asset_type {
        AssetType::Crypto => {
            LedgerRepository::apply_crypto_fill(
                conn,
                trade.user_id,
                &trade.symbol,
                side,
                quantity,
                price
            ).await?;
        }
        AssetType::Stock => {
            LedgerRepository::apply_stock_fill(
                conn,
                trade.user_id,
                &trade.symbol,
                side,
                quantity,
                price
            ).await?;
        }
    }

    let mut active: trade::ActiveModel = trade.into();
    active.status = Set(TradeStatus::Approved.to_string());
    active.admin_approval = Set(ApprovalStatus::Approved.to_string());
    active.approved_by = Set(Some(actor.admin_id));
    active.approved_at = Set(Some(chrono::Utc::now()));
    if notes.is_some() {
        active.notes = Set(notes);
    }
    let trade = active.update(conn).await?;

    AdminLogRepository::append(
        conn,
        actor.entry(
            "approve_trade",
            "trade",
            Some(trade.id.to_string()),
            json!({
                "userId": trade.user_id,
                "symbol": trade.symbol,
                "side": trade.side,
                "quantity": trade.quantity,
                "totalAmount": trade.total_amount,
            })
        )
    ).await?;

    Ok(trade)
}

fn required_reason(reason: Option<String>) -> Result<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or(AppError::MissingField("rejectionReason"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;
    use crate::db::{ NewDepositRequest, NewTrade, UserRepository };
    use crate::enums::OrderType;
    use rust_decimal::dec;
    use sea_orm::EntityTrait;

    struct Fixture {
        db: DatabaseConnection,
        approvals: ApprovalService,
        trades: TradeRepository,
        ledger: LedgerRepository,
        actor: AdminActor,
    }

    async fn fixture() -> Fixture {
        let db = memory_db().await;
        Fixture {
            approvals: ApprovalService::new(db.clone()),
            trades: TradeRepository::new(db.clone()),
            ledger: LedgerRepository::new(db.clone()),
            actor: AdminActor::new(Uuid::new_v4()),
            db,
        }
    }

    async fn user(db: &DatabaseConnection, name: &str) -> Uuid {
        UserRepository::new(db.clone())
            .create(name.to_string(), format!("{}@example.com", name), "hash".to_string()).await
            .unwrap().id
    }

    fn order(
        user_id: Uuid,
        symbol: &str,
        asset_type: AssetType,
        side: TradeSide,
        quantity: Decimal
    ) -> NewTrade {
        NewTrade {
            user_id,
            symbol: symbol.to_string(),
            asset_type,
            side,
            order_type: OrderType::Market,
            quantity,
            price: dec!(100),
        }
    }

    #[tokio::test]
    async fn test_approve_trade_moves_holding_once() {
        let f = fixture().await;
        let user_id = user(&f.db, "hank").await;
        let trade = f.trades
            .create(order(user_id, "AAPL", AssetType::Stock, TradeSide::Buy, dec!(2))).await
            .unwrap();

        let approved = f.approvals.approve_trade(trade.id, &f.actor, None).await.unwrap();
        assert_eq!(approved.admin_approval, "approved");
        assert_eq!(approved.status, "approved");
        assert_eq!(approved.approved_by, Some(f.actor.admin_id));
        assert!(approved.approved_at.is_some());

        let second = f.approvals.approve_trade(trade.id, &f.actor, None).await;
        assert!(matches!(second, Err(AppError::InvalidState(_))));

        let holdings = f.ledger.holdings_for_user(user_id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].quantity, "2");
        assert_eq!(holdings[0].average_price, "100");
    }

    #[tokio::test]
    async fn test_sell_beyond_position_stays_pending() {
        let f = fixture().await;
        let user_id = user(&f.db, "iris").await;
        let trade = f.trades
            .create(order(user_id, "ETH", AssetType::Crypto, TradeSide::Sell, dec!(1))).await
            .unwrap();

        let result = f.approvals.approve_trade(trade.id, &f.actor, None).await;
        assert!(matches!(result, Err(AppError::InsufficientHoldings(_))));

        let reloaded = f.trades.find_by_id(trade.id).await.unwrap();
        assert_eq!(reloaded.admin_approval, "pending");
        assert!(f.ledger.wallets_for_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fill_overflow_leaves_trade_pending() {
        let f = fixture().await;
        let user_id = user(&f.db, "ivan").await;
        let big = NewTrade {
            price: dec!(1),
            ..order(user_id, "BRK", AssetType::Stock, TradeSide::Buy, dec!(50000000000000000000000000000))
        };

        let first = f.trades.create(big.clone()).await.unwrap();
        let second = f.trades.create(big).await.unwrap();
        f.approvals.approve_trade(first.id, &f.actor, None).await.unwrap();

        let overflow = f.approvals.approve_trade(second.id, &f.actor, None).await;
        assert!(matches!(overflow, Err(AppError::InvalidInput(_))));
        assert_eq!(f.trades.find_by_id(second.id).await.unwrap().admin_approval, "pending");

        let holdings = f.ledger.holdings_for_user(user_id).await.unwrap();
        assert_eq!(holdings[0].quantity, "50000000000000000000000000000");
    }

    #[tokio::test]
    async fn test_bulk_approve_skips_foreign_and_unknown_ids() {
        let f = fixture().await;
        let owner = user(&f.db, "jack").await;
        let other = user(&f.db, "kate").await;

        let t1 = f.trades
            .create(order(owner, "BTC", AssetType::Crypto, TradeSide::Buy, dec!(1))).await
            .unwrap();
        let t2 = f.trades
            .create(order(other, "BTC", AssetType::Crypto, TradeSide::Buy, dec!(1))).await
            .unwrap();
        let t3 = f.trades
            .create(order(owner, "MSFT", AssetType::Stock, TradeSide::Buy, dec!(1))).await
            .unwrap();
        let missing = Uuid::new_v4();

        let results = f.approvals
            .bulk_approve_trades(owner, vec![t1.id, t2.id, t3.id, missing], &f.actor).await
            .unwrap();

        let outcomes: Vec<_> = results
            .iter()
            .map(|r| (r.id, r.outcome))
            .collect();
        assert_eq!(outcomes, vec![
            (t1.id, BulkOutcome::Approved),
            (t2.id, BulkOutcome::NotFound),
            (t3.id, BulkOutcome::Approved),
            (missing, BulkOutcome::NotFound)
        ]);

        assert_eq!(f.trades.find_by_id(t2.id).await.unwrap().admin_approval, "pending");

        let again = f.approvals.bulk_approve_trades(owner, vec![t1.id], &f.actor).await.unwrap();
        assert_eq!(again[0].outcome, BulkOutcome::NotPending);
    }

    #[tokio::test]
    async fn test_bulk_approve_reports_failed_fill_and_continues() {
        let f = fixture().await;
        let owner = user(&f.db, "kurt").await;

        let buy = f.trades
            .create(order(owner, "ETH", AssetType::Crypto, TradeSide::Buy, dec!(1))).await
            .unwrap();
        let oversell = f.trades
            .create(order(owner, "SOL", AssetType::Crypto, TradeSide::Sell, dec!(5))).await
            .unwrap();
        let stock = f.trades
            .create(order(owner, "AMZN", AssetType::Stock, TradeSide::Buy, dec!(2))).await
            .unwrap();

        let results = f.approvals
            .bulk_approve_trades(owner, vec![buy.id, oversell.id, stock.id], &f.actor).await
            .unwrap();

        let outcomes: Vec<_> = results
            .iter()
            .map(|r| r.outcome)
            .collect();
        assert_eq!(outcomes, vec![BulkOutcome::Approved, BulkOutcome::Error, BulkOutcome::Approved]);
        assert_eq!(results[1].id, oversell.id);
        assert_eq!(results[1].code.as_deref(), Some("INSUFFICIENT_HOLDINGS"));
        assert_eq!(results[1].message.as_deref(), Some("Position in SOL is smaller than the order"));
        assert!(results[0].code.is_none());

        assert_eq!(f.trades.find_by_id(oversell.id).await.unwrap().admin_approval, "pending");
        assert_eq!(f.trades.find_by_id(stock.id).await.unwrap().admin_approval, "approved");

        let wallets = f.ledger.wallets_for_user(owner).await.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].symbol, "ETH");
    }

    #[tokio::test]
    async fn test_reject_trade_requires_reason() {
        let f = fixture().await;
        let user_id = user(&f.db, "liam").await;
        let trade = f.trades
            .create(order(user_id, "TSLA", AssetType::Stock, TradeSide::Buy, dec!(1))).await
            .unwrap();

        let missing = f.approvals.reject_trade(trade.id, &f.actor, RejectRequest {
            rejection_reason: Some("   ".to_string()),
            notes: None,
        }).await;
        assert!(matches!(missing, Err(AppError::MissingField("rejectionReason"))));

        let rejected = f.approvals
            .reject_trade(trade.id, &f.actor, RejectRequest {
                rejection_reason: Some("Market closed".to_string()),
                notes: Some("retry Monday".to_string()),
            }).await
            .unwrap();
        assert_eq!(rejected.status, "rejected");
        assert_eq!(rejected.admin_approval, "rejected");
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Market closed"));

        let approve_after_reject = f.approvals.approve_trade(trade.id, &f.actor, None).await;
        assert!(matches!(approve_after_reject, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_close_requires_approved_trade() {
        let f = fixture().await;
        let user_id = user(&f.db, "mona").await;
        let trade = f.trades
            .create(order(user_id, "NVDA", AssetType::Stock, TradeSide::Buy, dec!(1))).await
            .unwrap();

        let early = f.approvals.close_trade(trade.id, &f.actor, None).await;
        assert!(matches!(early, Err(AppError::InvalidState(_))));

        f.approvals.approve_trade(trade.id, &f.actor, None).await.unwrap();
        let closed = f.approvals.close_trade(trade.id, &f.actor, Some(dec!(-12.5))).await.unwrap();
        assert_eq!(closed.status, "closed");
        assert_eq!(closed.admin_approval, "approved");
        assert_eq!(closed.profit_loss.as_deref(), Some("-12.5"));
        assert!(closed.closed_at.is_some());

        let edited = f.approvals.set_trade_profit_loss(trade.id, &f.actor, dec!(40)).await.unwrap();
        assert_eq!(edited.profit_loss.as_deref(), Some("40"));
    }

    async fn deposit(f: &Fixture, user_id: Uuid) -> deposit_request::Model {
        DepositRepository::new(f.db.clone())
            .create(NewDepositRequest {
                user_id,
                crypto_type: "BTC".to_string(),
                amount: dec!(0.25),
                usd_value: dec!(15000),
                deposit_address: "bc1qexample".to_string(),
                crypto_address_id: None,
                tx_hash: None,
            }).await
            .unwrap()
    }

    #[tokio::test]
    async fn test_approve_deposit_credits_wallet_once() {
        let f = fixture().await;
        let user_id = user(&f.db, "nick").await;
        let first = deposit(&f, user_id).await;
        let second = deposit(&f, user_id).await;

        f.approvals.approve_deposit(first.id, &f.actor, Some("seen on chain".into())).await.unwrap();
        f.approvals.approve_deposit(second.id, &f.actor, None).await.unwrap();
        let repeat = f.approvals.approve_deposit(first.id, &f.actor, None).await;
        assert!(matches!(repeat, Err(AppError::InvalidState(_))));

        let wallets = f.ledger.wallets_for_user(user_id).await.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].symbol, "BTC");
        assert_eq!(wallets[0].balance, "0.5");
        assert_eq!(wallets[0].usd_value, "30000");

        let logs = crate::db::AdminLog::find().all(&f.db).await.unwrap();
        assert_eq!(logs.iter().filter(|l| l.action == "approve_deposit").count(), 2);
    }

    #[tokio::test]
    async fn test_reject_deposit() {
        let f = fixture().await;
        let user_id = user(&f.db, "olga").await;
        let request = deposit(&f, user_id).await;

        let missing = f.approvals.reject_deposit(request.id, &f.actor, RejectRequest::default()).await;
        assert!(matches!(missing, Err(AppError::MissingField("rejectionReason"))));

        let rejected = f.approvals
            .reject_deposit(request.id, &f.actor, RejectRequest {
                rejection_reason: Some("No matching transaction".to_string()),
                notes: None,
            }).await
            .unwrap();
        assert_eq!(rejected.status, "rejected");
        assert!(f.ledger.wallets_for_user(user_id).await.unwrap().is_empty());

        let unknown = f.approvals.approve_deposit(Uuid::new_v4(), &f.actor, None).await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }
}
