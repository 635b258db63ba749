use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Trades::Table)
                .if_not_exists()
                .col(ColumnDef::new(Trades::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Trades::UserId).uuid().not_null())
                .col(ColumnDef::new(Trades::Symbol).string_len(20).not_null())
                .col(ColumnDef::new(Trades::AssetType).string_len(10).not_null())
                .col(ColumnDef::new(Trades::Side).string_len(10).not_null())
                .col(ColumnDef::new(Trades::OrderType).string_len(10).not_null())
                .col(ColumnDef::new(Trades::Quantity).string_len(50).not_null())
                .col(ColumnDef::new(Trades::Price).string_len(50).not_null())
                .col(ColumnDef::new(Trades::TotalAmount).string_len(50).not_null())
                .col(ColumnDef::new(Trades::Status).string_len(20).not_null())
                .col(ColumnDef::new(Trades::AdminApproval).string_len(20).not_null())
                .col(ColumnDef::new(Trades::ProfitLoss).string_len(50).null())
                .col(ColumnDef::new(Trades::RejectionReason).text().null())
                .col(ColumnDef::new(Trades::Notes).text().null())
                .col(ColumnDef::new(Trades::ApprovedBy).uuid().null())
                .col(ColumnDef::new(Trades::ApprovedAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(Trades::ClosedAt).timestamp_with_time_zone().null())
                .col(
                    ColumnDef::new(Trades::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_trades_user")
                        .from(Trades::Table, Trades::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_trades_user_id")
                .table(Trades::Table)
                .col(Trades::UserId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_trades_admin_approval")
                .table(Trades::Table)
                .col(Trades::AdminApproval)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Trades::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Trades {
    Table,
    Id,
    UserId,
    Symbol,
    AssetType,
    Side,
    OrderType,
    Quantity,
    Price,
    TotalAmount,
    Status,
    AdminApproval,
    ProfitLoss,
    RejectionReason,
    Notes,
    ApprovedBy,
    ApprovedAt,
    ClosedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
