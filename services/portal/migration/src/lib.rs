use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250901_000001_create_users;
mod m20250901_000002_create_projects;
mod m20250901_000003_create_progress_updates;
mod m20250901_000004_create_evaluations;
mod m20250901_000005_create_feedback;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_projects::Migration),
            Box::new(m20250901_000003_create_progress_updates::Migration),
            Box::new(m20250901_000004_create_evaluations::Migration),
            Box::new(m20250901_000005_create_feedback::Migration),
        ]
    }
}
