use chrono::{ DateTime, Utc };
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{ session, Session };
use crate::error::Result;

pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        id: String,
        user_id: Option<Uuid>,
        admin_id: Option<Uuid>,
        expires_at: DateTime<Utc>
    ) -> Result<session::Model> {
        let session = session::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            admin_id: Set(admin_id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        };

        Ok(session.insert(&self.db).await?)
    }

    pub async fn find_live(&self, id: &str) -> Result<Option<session::Model>> {
        let session = Session::find_by_id(id.to_string())
            .filter(session::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db).await?;

        Ok(session)
    }

    pub async fn set_slots(
        &self,
        session: session::Model,
        user_id: Option<Uuid>,
        admin_id: Option<Uuid>
    ) -> Result<session::Model> {
        let mut active: session::ActiveModel = session.into();
        active.user_id = Set(user_id);
        active.admin_id = Set(admin_id);

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        Session::delete_by_id(id.to_string()).exec(&self.db).await?;
        Ok(())
    }

    pub async fn delete_expired(&self) -> Result<u64> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.db).await?;

        Ok(result.rows_affected)
    }
}
