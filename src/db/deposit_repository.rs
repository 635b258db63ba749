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

use crate::db::entity::{ deposit_request, user, DepositRequest, User };
use crate::db::supports_row_locks;
use crate::enums::ApprovalStatus;
use crate::error::Result;
use crate::money;

#[derive(Debug, Clone)]
pub struct NewDepositRequest {
    pub user_id: Uuid,
    pub crypto_type: String,
    pub amount: Decimal,
    pub usd_value: Decimal,
    pub deposit_address: String,
    pub crypto_address_id: Option<Uuid>,
    pub tx_hash: Option<String>,
}

pub struct DepositRepository {
    db: DatabaseConnection,
}

impl DepositRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: NewDepositRequest) -> Result<deposit_request::Model> {
        let deposit = deposit_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(request.user_id),
            crypto_type: Set(request.crypto_type),
            amount: Set(money::to_stored(request.amount)),
            usd_value: Set(money::to_stored(request.usd_value)),
            deposit_address: Set(request.deposit_address),
            crypto_address_id: Set(request.crypto_address_id),
            tx_hash: Set(request.tx_hash),
            status: Set(ApprovalStatus::Pending.to_string()),
            rejection_reason: Set(None),
            notes: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        Ok(deposit.insert(&self.db).await?)
    }

    pub async fn find_for_update<C: ConnectionTrait>(
        conn: &C,
        id: Uuid
    ) -> Result<Option<deposit_request::Model>> {
        let mut query = DepositRequest::find_by_id(id);
        if supports_row_locks(conn) {
            query = query.lock_exclusive();
        }

        Ok(query.one(conn).await?)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<deposit_request::Model>> {
        let deposits = DepositRequest::find()
            .filter(deposit_request::Column::UserId.eq(user_id))
            .order_by_desc(deposit_request::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(deposits)
    }

    pub async fn list_all_with_users(
        &self,
        status: Option<ApprovalStatus>
    ) -> Result<Vec<(deposit_request::Model, Option<user::Model>)>> {
        let mut query = DepositRequest::find();
        if let Some(status) = status {
            query = query.filter(deposit_request::Column::Status.eq(status.as_str()));
        }

        let deposits = query
            .find_also_related(User)
            .order_by_desc(deposit_request::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(deposits)
    }

    pub async fn count_pending(&self) -> Result<u64> {
        let count = DepositRequest::find()
            .filter(deposit_request::Column::Status.eq(ApprovalStatus::Pending.as_str()))
            .count(&self.db).await?;

        Ok(count)
    }
}
