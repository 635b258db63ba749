use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Users::Username).string_len(64).not_null().unique_key())
                .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                .col(ColumnDef::new(Users::LastLoginAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(Users::LastLoginIp).string_len(64).null())
                .col(
                    ColumnDef::new(Users::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        // Admin identities live apart from regular users; an email may appear in both
        manager.create_table(
            Table::create()
                .table(AdminUsers::Table)
                .if_not_exists()
                .col(ColumnDef::new(AdminUsers::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(AdminUsers::Email).string().not_null().unique_key())
                .col(ColumnDef::new(AdminUsers::PasswordHash).text().not_null())
                .col(ColumnDef::new(AdminUsers::Role).string_len(20).not_null())
                .col(ColumnDef::new(AdminUsers::IsActive).boolean().not_null().default(true))
                .col(ColumnDef::new(AdminUsers::LastLoginAt).timestamp_with_time_zone().null())
                .col(
                    ColumnDef::new(AdminUsers::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AdminUsers::Table).to_owned()).await?;

        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsActive,
    LastLoginAt,
    LastLoginIp,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdminUsers {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    IsActive,
    LastLoginAt,
    CreatedAt,
}
