use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(WebsiteSettings::Table)
                .if_not_exists()
                .col(ColumnDef::new(WebsiteSettings::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(WebsiteSettings::Key).string_len(100).not_null().unique_key())
                .col(ColumnDef::new(WebsiteSettings::Value).text().not_null())
                .col(ColumnDef::new(WebsiteSettings::Category).string_len(50).not_null())
                .col(ColumnDef::new(WebsiteSettings::UpdatedBy).uuid().null())
                .col(ColumnDef::new(WebsiteSettings::UpdatedAt).timestamp_with_time_zone().not_null())
                .to_owned()
        ).await?;

        // Append-only audit trail
        manager.create_table(
            Table::create()
                .table(AdminLogs::Table)
                .if_not_exists()
                .col(ColumnDef::new(AdminLogs::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(AdminLogs::AdminId).uuid().not_null())
                .col(ColumnDef::new(AdminLogs::Action).string_len(100).not_null())
                .col(ColumnDef::new(AdminLogs::Resource).string_len(50).not_null())
                .col(ColumnDef::new(AdminLogs::ResourceId).string().null())
                .col(ColumnDef::new(AdminLogs::Details).json().null())
                .col(ColumnDef::new(AdminLogs::IpAddress).string_len(64).null())
                .col(ColumnDef::new(AdminLogs::UserAgent).text().null())
                .col(
                    ColumnDef::new(AdminLogs::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_admin_logs_created_at")
                .table(AdminLogs::Table)
                .col(AdminLogs::CreatedAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AdminLogs::Table).to_owned()).await?;

        manager.drop_table(Table::drop().table(WebsiteSettings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WebsiteSettings {
    Table,
    Id,
    Key,
    Value,
    Category,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminLogs {
    Table,
    Id,
    AdminId,
    Action,
    Resource,
    ResourceId,
    Details,
    IpAddress,
    UserAgent,
    CreatedAt,
}
