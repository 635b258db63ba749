use sea_orm::{
    sea_query::OnConflict,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{ website_setting, WebsiteSetting };
use crate::error::{ AppError, Result };

pub const DEFAULT_CATEGORY: &str = "general";

pub struct SettingRepository {
    db: DatabaseConnection,
}

impl SettingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<website_setting::Model>> {
        let settings = WebsiteSetting::find()
            .order_by_asc(website_setting::Column::Category)
            .order_by_asc(website_setting::Column::Key)
            .all(&self.db).await?;

        Ok(settings)
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<website_setting::Model>> {
        Self::find_in(&self.db, key).await
    }

    async fn find_in<C: ConnectionTrait>(
        conn: &C,
        key: &str
    ) -> Result<Option<website_setting::Model>> {
        let setting = WebsiteSetting::find()
            .filter(website_setting::Column::Key.eq(key))
            .one(conn).await?;

        Ok(setting)
    }

    /// Insert or overwrite the value stored under `key`.
    pub async fn upsert<C: ConnectionTrait>(
        conn: &C,
        key: &str,
        value: String,
        category: Option<String>,
        updated_by: Uuid
    ) -> Result<website_setting::Model> {
        let keep_category = category.is_none();
        let setting = website_setting::ActiveModel {
            id: Set(Uuid::new_v4()),
            key: Set(key.to_string()),
            value: Set(value),
            category: Set(category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            updated_by: Set(Some(updated_by)),
            updated_at: Set(chrono::Utc::now()),
        };

        let mut on_conflict = OnConflict::column(website_setting::Column::Key);
        on_conflict.update_columns([
            website_setting::Column::Value,
            website_setting::Column::UpdatedBy,
            website_setting::Column::UpdatedAt,
        ]);
        // A missing category on update keeps the stored one
        if !keep_category {
            on_conflict.update_column(website_setting::Column::Category);
        }

        WebsiteSetting::insert(setting)
            .on_conflict(on_conflict)
            .exec_without_returning(conn).await?;

        Self::find_in(conn, key).await?.ok_or_else(||
            AppError::Internal(format!("Setting '{}' vanished after upsert", key))
        )
    }
}
