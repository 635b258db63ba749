use rust_decimal::Decimal;
use sea_orm::{ DatabaseConnection, TransactionTrait };
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::{ portfolio, AdminLogRepository, LedgerRepository };
use crate::enums::AdjustmentType;
use crate::error::{ AppError, Result };
use crate::money;
use crate::services::audit::AdminActor;

#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Manual portfolio corrections made by administrators.
pub struct BalanceService {
    db: DatabaseConnection,
}

impl BalanceService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Apply an adjustment under a row lock so concurrent adjustments serialize.
    pub async fn adjust_balance(
        &self,
        user_id: Uuid,
        request: AdjustBalanceRequest,
        actor: &AdminActor
    ) -> Result<portfolio::Model> {
        let amount = money::require_non_negative(
            request.amount.ok_or(AppError::MissingField("amount"))?,
            "amount"
        )?;
        let kind: AdjustmentType = request.kind.ok_or(AppError::MissingField("type"))?.parse()?;

        let txn = self.db.begin().await?;

        let portfolio = LedgerRepository::portfolio_for_update(&txn, user_id).await?.ok_or_else(|| {
            AppError::NotFound("Portfolio not found".to_string())
        })?;
        let previous = portfolio.total_balance.clone();
        let (balance, profit_loss) = apply_adjustment(
            money::parse_stored(&portfolio.total_balance)?,
            money::parse_stored(&portfolio.total_profit_loss)?,
            amount,
            kind
        )?;
        let portfolio = LedgerRepository::save_portfolio_totals(
            &txn,
            portfolio,
            balance,
            profit_loss
        ).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "adjust_balance",
                "portfolio",
                Some(user_id.to_string()),
                json!({
                    "type": kind,
                    "amount": money::to_stored(amount),
                    "previousBalance": previous,
                    "newBalance": portfolio.total_balance,
                })
            )
        ).await?;

        txn.commit().await?;

        tracing::info!(
            "Admin {} applied {} {} to user {} (balance {} -> {})",
            actor.admin_id,
            kind,
            amount,
            user_id,
            previous,
            portfolio.total_balance
        );
        Ok(portfolio)
    }
}

/// New `(total_balance, total_profit_loss)` after an adjustment.
/// `remove` floors the balance at zero; `profit` moves both figures.
pub fn apply_adjustment(
    balance: Decimal,
    profit_loss: Decimal,
    amount: Decimal,
    kind: AdjustmentType
) -> Result<(Decimal, Decimal)> {
    let adjusted = match kind {
        AdjustmentType::Add => (money::add(balance, amount)?, profit_loss),
        AdjustmentType::Remove => (money::sub(balance, amount)?.max(Decimal::ZERO), profit_loss),
        AdjustmentType::Profit => (money::add(balance, amount)?, money::add(profit_loss, amount)?),
    };
    Ok(adjusted)
}
