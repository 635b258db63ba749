use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{ admin_user, user, AdminUser, User };
use crate::error::{ AppError, Result };

/// Identity store: end users and administrators.
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String
    ) -> Result<user::Model> {
        let user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            is_active: Set(true),
            last_login_at: Set(None),
            last_login_ip: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        let user = user.insert(&self.db).await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<user::Model> {
        User::find_by_id(id)
            .one(&self.db).await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        let user = User::find().filter(user::Column::Username.eq(username)).one(&self.db).await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let user = User::find().filter(user::Column::Email.eq(email)).one(&self.db).await?;

        Ok(user)
    }

    pub async fn record_login(&self, id: Uuid, ip: Option<String>) -> Result<user::Model> {
        let user = self.find_by_id(id).await?;

        let mut active: user::ActiveModel = user.into();
        active.last_login_at = Set(Some(chrono::Utc::now()));
        active.last_login_ip = Set(ip);

        Ok(active.update(&self.db).await?)
    }

    pub async fn set_active<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        is_active: bool
    ) -> Result<user::Model> {
        let user = User::find_by_id(id)
            .one(conn).await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(is_active);

        Ok(active.update(conn).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<user::Model>> {
        let users = User::find().order_by_desc(user::Column::CreatedAt).all(&self.db).await?;

        Ok(users)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(User::find().count(&self.db).await?)
    }

    pub async fn count_active(&self) -> Result<u64> {
        Ok(User::find().filter(user::Column::IsActive.eq(true)).count(&self.db).await?)
    }

    pub async fn create_admin(
        &self,
        email: String,
        password_hash: String,
        role: String
    ) -> Result<admin_user::Model> {
        let admin = admin_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        Ok(admin.insert(&self.db).await?)
    }

    pub async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<admin_user::Model>> {
        Ok(AdminUser::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<admin_user::Model>> {
        let admin = AdminUser::find()
            .filter(admin_user::Column::Email.eq(email))
            .one(&self.db).await?;

        Ok(admin)
    }

    pub async fn record_admin_login(&self, admin: admin_user::Model) -> Result<admin_user::Model> {
        let mut active: admin_user::ActiveModel = admin.into();
        active.last_login_at = Set(Some(chrono::Utc::now()));

        Ok(active.update(&self.db).await?)
    }
}
