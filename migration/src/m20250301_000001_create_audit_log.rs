use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only audit_log table
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLog::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AuditLog::Timestamp).string().not_null())
                    .col(ColumnDef::new(AuditLog::Action).string().not_null())
                    .col(ColumnDef::new(AuditLog::TableName).string().not_null())
                    .col(ColumnDef::new(AuditLog::RecordKey).string().not_null())
                    .col(ColumnDef::new(AuditLog::Changes).string())
                    .col(ColumnDef::new(AuditLog::OldValues).string())
                    .col(ColumnDef::new(AuditLog::NewValues).string())
                    .col(ColumnDef::new(AuditLog::Context).string())
                    .col(ColumnDef::new(AuditLog::Notes).string())
                    .to_owned(),
            )
            .await?;

        // Create indexes separately
        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_timestamp")
                    .table(AuditLog::Table)
                    .col(AuditLog::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_table_action")
                    .table(AuditLog::Table)
                    .col(AuditLog::TableName)
                    .col(AuditLog::Action)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_record_key")
                    .table(AuditLog::Table)
                    .col(AuditLog::RecordKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuditLog {
    Table,
    Id,
    Timestamp,
    Action,
    TableName,
    RecordKey,
    Changes,
    OldValues,
    NewValues,
    Context,
    Notes,
}
