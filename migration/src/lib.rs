pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_ledger_tables;
mod m20250102_000001_create_trades_table;
mod m20250103_000001_create_crypto_addresses_table;
mod m20250103_000002_create_deposit_requests_table;
mod m20250104_000001_create_admin_tables;
mod m20250105_000001_create_sessions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_ledger_tables::Migration),
            Box::new(m20250102_000001_create_trades_table::Migration),
            Box::new(m20250103_000001_create_crypto_addresses_table::Migration),
            Box::new(m20250103_000002_create_deposit_requests_table::Migration),
            Box::new(m20250104_000001_create_admin_tables::Migration),
            Box::new(m20250105_000001_create_sessions_table::Migration)
        ]
    }
}
