use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::TicketId)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Tickets::Description).text().not_null())
                    .col(
                        ColumnDef::new(Tickets::Status)
                            .string_len(20)
                            .not_null()
                            .default("Open"),
                    )
                    .col(ColumnDef::new(Tickets::CreatedBy).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tickets::LastUpdated)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Owner listings filter on createdBy and page by createdAt
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_created_by")
                    .table(Tickets::Table)
                    .col(Tickets::CreatedBy)
                    .col(Tickets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_created_at")
                    .table(Tickets::Table)
                    .col(Tickets::CreatedAt)
                    .col(Tickets::TicketId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    #[sea_orm(iden = "ticket_id")]
    TicketId,
    Title,
    Description,
    Status,
    #[sea_orm(iden = "createdBy")]
    CreatedBy,
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
    #[sea_orm(iden = "last_updated")]
    LastUpdated,
}
