use std::time::Duration;

use sea_orm::{ ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend };
use sea_orm_migration::MigratorTrait;

use crate::error::Result;

pub mod entity;
pub use entity::*;

mod user_repository;
pub use user_repository::UserRepository;

mod ledger_repository;
pub use ledger_repository::LedgerRepository;

mod trade_repository;
pub use trade_repository::{ TradeRepository, NewTrade };

mod deposit_repository;
pub use deposit_repository::{ DepositRepository, NewDepositRequest };

mod crypto_address_repository;
pub use crypto_address_repository::{ CryptoAddressRepository, CryptoAddressChanges, NewCryptoAddress };

mod setting_repository;
pub use setting_repository::SettingRepository;

mod session_repository;
pub use session_repository::SessionRepository;

mod admin_log_repository;
pub use admin_log_repository::{ AdminLogRepository, AuditEntry };

/// Open a pooled connection and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.connect_timeout(Duration::from_secs(10)).sqlx_logging(false);

    // Every connection to an in-memory SQLite database sees its own empty schema
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;

    Ok(db)
}

/// Row locks are only issued where the backend understands `FOR UPDATE`.
pub(crate) fn supports_row_locks<C: ConnectionTrait>(conn: &C) -> bool {
    matches!(conn.get_database_backend(), DbBackend::Postgres | DbBackend::MySql)
}

#[cfg(test)]
pub(crate) mod testing {
    use sea_orm::DatabaseConnection;

    pub async fn memory_db() -> DatabaseConnection {
        super::connect("sqlite::memory:").await.expect("in-memory database")
    }
}
