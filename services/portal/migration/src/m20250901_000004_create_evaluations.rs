use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Evaluations::ProjectId).big_integer().not_null())
                    .col(ColumnDef::new(Evaluations::FinalScore).integer().not_null())
                    .col(ColumnDef::new(Evaluations::Comment).text().not_null())
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Evaluations::Table)
                    .col(Evaluations::ProjectId)
                    .col(Evaluations::CreatedAt)
                    .name("idx_evaluations_project_created")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Evaluations {
    Table,
    Id,
    ProjectId,
    FinalScore,
    Comment,
    CreatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
}
