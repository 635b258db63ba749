use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(DepositRequests::Table)
                .if_not_exists()
                .col(ColumnDef::new(DepositRequests::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(DepositRequests::UserId).uuid().not_null())
                .col(ColumnDef::new(DepositRequests::CryptoType).string_len(20).not_null())
                .col(ColumnDef::new(DepositRequests::Amount).string_len(50).not_null())
                .col(ColumnDef::new(DepositRequests::UsdValue).string_len(50).not_null())
                .col(ColumnDef::new(DepositRequests::DepositAddress).string().not_null())
                .col(ColumnDef::new(DepositRequests::CryptoAddressId).uuid().null())
                .col(ColumnDef::new(DepositRequests::TxHash).string().null())
                .col(ColumnDef::new(DepositRequests::Status).string_len(20).not_null())
                .col(ColumnDef::new(DepositRequests::RejectionReason).text().null())
                .col(ColumnDef::new(DepositRequests::Notes).text().null())
                .col(ColumnDef::new(DepositRequests::ApprovedBy).uuid().null())
                .col(ColumnDef::new(DepositRequests::ApprovedAt).timestamp_with_time_zone().null())
                .col(
                    ColumnDef::new(DepositRequests::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_deposit_requests_user")
                        .from(DepositRequests::Table, DepositRequests::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_deposit_requests_crypto_address")
                        .from(DepositRequests::Table, DepositRequests::CryptoAddressId)
                        .to(CryptoAddresses::Table, CryptoAddresses::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_deposit_requests_status")
                .table(DepositRequests::Table)
                .col(DepositRequests::Status)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DepositRequests::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DepositRequests {
    Table,
    Id,
    UserId,
    CryptoType,
    Amount,
    UsdValue,
    DepositAddress,
    CryptoAddressId,
    TxHash,
    Status,
    RejectionReason,
    Notes,
    ApprovedBy,
    ApprovedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CryptoAddresses {
    Table,
    Id,
}
