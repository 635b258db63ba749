use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(CryptoAddresses::Table)
                .if_not_exists()
                .col(ColumnDef::new(CryptoAddresses::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(CryptoAddresses::Symbol).string_len(20).not_null())
                .col(ColumnDef::new(CryptoAddresses::Name).string().not_null())
                .col(ColumnDef::new(CryptoAddresses::Address).string().not_null())
                .col(ColumnDef::new(CryptoAddresses::Network).string_len(50).not_null())
                .col(ColumnDef::new(CryptoAddresses::IsActive).boolean().not_null().default(true))
                .col(
                    ColumnDef::new(CryptoAddresses::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(ColumnDef::new(CryptoAddresses::UpdatedAt).timestamp_with_time_zone().not_null())
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_crypto_addresses_symbol_network")
                .table(CryptoAddresses::Table)
                .col(CryptoAddresses::Symbol)
                .col(CryptoAddresses::Network)
                .unique()
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CryptoAddresses::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CryptoAddresses {
    Table,
    Id,
    Symbol,
    Name,
    Address,
    Network,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
