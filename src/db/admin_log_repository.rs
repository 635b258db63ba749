use sea_orm::{
    ActiveModelTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryOrder,
    QuerySelect,
    Set,
};
use serde_json::Value;
use uuid::Uuid;

use crate::db::entity::{ admin_log, AdminLog };
use crate::error::Result;

/// One privileged mutation, as recorded in the audit trail.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub admin_id: Uuid,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub struct AdminLogRepository {
    db: DatabaseConnection,
}

impl AdminLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append-only; there is no update or delete path for audit rows.
    pub async fn append<C: ConnectionTrait>(conn: &C, entry: AuditEntry) -> Result<admin_log::Model> {
        let log = admin_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            admin_id: Set(entry.admin_id),
            action: Set(entry.action),
            resource: Set(entry.resource),
            resource_id: Set(entry.resource_id),
            details: Set(Some(entry.details)),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            created_at: Set(chrono::Utc::now()),
        };

        Ok(log.insert(conn).await?)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<admin_log::Model>> {
        let logs = AdminLog::find()
            .order_by_desc(admin_log::Column::CreatedAt)
            .limit(limit)
            .all(&self.db).await?;

        Ok(logs)
    }
}
