use sea_orm::entity::prelude::*;

/// Portal account. `role` holds the wire name (`"STUDENT"`, `"SUPERVISOR"`, ...).
///
/// `supervisor_id` and `supervisor_name` are only ever written together.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub faculty: Option<String>,
    pub supervisor_id: Option<i64>,
    pub supervisor_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::SupervisorId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Supervisor,
}

impl ActiveModelBehavior for ActiveModel {}
