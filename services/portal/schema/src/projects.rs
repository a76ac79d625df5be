use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub tools: Option<String>,
    pub category: Option<String>,
    pub github_link: Option<String>,
    pub status: String,
    pub student_id: i64,
    pub faculty_id: Option<i64>,
    pub progress: i32,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FacultyId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Faculty,
    #[sea_orm(has_many = "super::progress_updates::Entity")]
    ProgressUpdates,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::progress_updates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgressUpdates.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
