use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{ trade, user, Trade, User };
use crate::db::supports_row_locks;
use crate::enums::{ ApprovalStatus, AssetType, OrderType, TradeSide, TradeStatus };
use crate::error::{ AppError, Result };
use crate::money;

/// Validated order ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewTrade {
    pub user_id: Uuid,
    pub symbol: String,
    pub asset_type: AssetType,
    pub side: TradeSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Decimal,
}

pub struct TradeRepository {
    db: DatabaseConnection,
}

impl TradeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_trade: NewTrade) -> Result<trade::Model> {
        let total_amount = money::mul(new_trade.quantity, new_trade.price)?;

        let trade = trade::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new_trade.user_id),
            symbol: Set(new_trade.symbol),
            asset_type: Set(new_trade.asset_type.to_string()),
            side: Set(new_trade.side.to_string()),
            order_type: Set(new_trade.order_type.to_string()),
            quantity: Set(money::to_stored(new_trade.quantity)),
            price: Set(money::to_stored(new_trade.price)),
            total_amount: Set(money::to_stored(total_amount)),
            status: Set(TradeStatus::Open.to_string()),
            admin_approval: Set(ApprovalStatus::Pending.to_string()),
            profit_loss: Set(None),
            rejection_reason: Set(None),
            notes: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            closed_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        Ok(trade.insert(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<trade::Model> {
        Trade::find_by_id(id)
            .one(&self.db).await?
            .ok_or_else(|| AppError::NotFound("Trade not found".to_string()))
    }

    pub async fn find_for_update<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<trade::Model>> {
        let mut query = Trade::find_by_id(id);
        if supports_row_locks(conn) {
            query = query.lock_exclusive();
        }

        Ok(query.one(conn).await?)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<trade::Model>> {
        let trades = Trade::find()
            .filter(trade::Column::UserId.eq(user_id))
            .order_by_desc(trade::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(trades)
    }

    /// Every trade with its owner, newest first.
    pub async fn list_all_with_users(&self) -> Result<Vec<(trade::Model, Option<user::Model>)>> {
        let trades = Trade::find()
            .find_also_related(User)
            .order_by_desc(trade::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(trades)
    }

    pub async fn count_pending(&self) -> Result<u64> {
        let count = Trade::find()
            .filter(trade::Column::AdminApproval.eq(ApprovalStatus::Pending.as_str()))
            .count(&self.db).await?;

        Ok(count)
    }
}
