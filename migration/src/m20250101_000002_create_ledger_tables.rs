use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Portfolios::Table)
                .if_not_exists()
                .col(ColumnDef::new(Portfolios::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Portfolios::UserId).uuid().not_null().unique_key())
                .col(ColumnDef::new(Portfolios::TotalBalance).string_len(50).not_null())
                .col(ColumnDef::new(Portfolios::TodaysPnl).string_len(50).not_null())
                .col(ColumnDef::new(Portfolios::TotalProfitLoss).string_len(50).not_null())
                .col(ColumnDef::new(Portfolios::WinRate).string_len(50).not_null())
                .col(ColumnDef::new(Portfolios::ActiveAlgorithms).integer().not_null().default(0))
                .col(ColumnDef::new(Portfolios::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_portfolios_user")
                        .from(Portfolios::Table, Portfolios::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(UserWallets::Table)
                .if_not_exists()
                .col(ColumnDef::new(UserWallets::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(UserWallets::UserId).uuid().not_null())
                .col(ColumnDef::new(UserWallets::Symbol).string_len(20).not_null())
                .col(ColumnDef::new(UserWallets::Balance).string_len(50).not_null())
                .col(ColumnDef::new(UserWallets::UsdValue).string_len(50).not_null())
                .col(ColumnDef::new(UserWallets::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_wallets_user")
                        .from(UserWallets::Table, UserWallets::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_user_wallets_user_symbol")
                .table(UserWallets::Table)
                .col(UserWallets::UserId)
                .col(UserWallets::Symbol)
                .unique()
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(StockHoldings::Table)
                .if_not_exists()
                .col(ColumnDef::new(StockHoldings::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(StockHoldings::UserId).uuid().not_null())
                .col(ColumnDef::new(StockHoldings::Symbol).string_len(20).not_null())
                .col(ColumnDef::new(StockHoldings::Quantity).string_len(50).not_null())
                .col(ColumnDef::new(StockHoldings::AveragePrice).string_len(50).not_null())
                .col(ColumnDef::new(StockHoldings::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_stock_holdings_user")
                        .from(StockHoldings::Table, StockHoldings::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_stock_holdings_user_symbol")
                .table(StockHoldings::Table)
                .col(StockHoldings::UserId)
                .col(StockHoldings::Symbol)
                .unique()
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StockHoldings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(UserWallets::Table).to_owned()).await?;

        manager.drop_table(Table::drop().table(Portfolios::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    UserId,
    TotalBalance,
    TodaysPnl,
    TotalProfitLoss,
    WinRate,
    ActiveAlgorithms,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserWallets {
    Table,
    Id,
    UserId,
    Symbol,
    Balance,
    UsdValue,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StockHoldings {
    Table,
    Id,
    UserId,
    Symbol,
    Quantity,
    AveragePrice,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
