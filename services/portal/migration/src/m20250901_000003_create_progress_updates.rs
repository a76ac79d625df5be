use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgressUpdates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgressUpdates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProgressUpdates::ProjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgressUpdates::WeekNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgressUpdates::Description).text().not_null())
                    .col(ColumnDef::new(ProgressUpdates::Feedback).text().null())
                    .col(
                        ColumnDef::new(ProgressUpdates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProgressUpdates::Table, ProgressUpdates::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(ProgressUpdates::Table)
                    .col(ProgressUpdates::ProjectId)
                    .col(ProgressUpdates::WeekNumber)
                    .unique()
                    .name("uq_progress_updates_project_week")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgressUpdates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProgressUpdates {
    Table,
    Id,
    ProjectId,
    WeekNumber,
    Description,
    Feedback,
    CreatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
}
