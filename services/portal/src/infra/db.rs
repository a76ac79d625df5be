use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel as _, PaginatorTrait as _, QueryFilter, QueryOrder, SqlErr, TransactionError,
    TransactionTrait,
    sea_query::{Expr, Query, SimpleExpr},
};

use portal_domain::id::{EvaluationId, FeedbackId, ProgressUpdateId, ProjectId, UserId};
use portal_domain::project::ProjectStatus;
use portal_domain::user::Role;
use portal_schema::{evaluations, feedback, progress_updates, projects, users};

use crate::domain::repository::{
    EvaluationRepository, FeedbackRepository, ProgressUpdateRepository, ProjectRepository,
    UserRepository,
};
use crate::domain::types::{
    Evaluation, Feedback, NewProgressUpdate, NewProject, NewUser, ProgressUpdate,
    ProgressUpdateEdit, Project, ProjectDetails, SupervisorLink, User, UserProfileUpdate,
};
use crate::error::PortalError;

fn role_names(roles: &[Role]) -> Vec<&'static str> {
    roles.iter().map(|r| r.as_str()).collect()
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn list_where(
        &self,
        filter: sea_orm::Condition,
        what: &'static str,
    ) -> Result<Vec<User>, PortalError> {
        let models = users::Entity::find()
            .filter(filter)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context(what)?;
        models.into_iter().map(user_from_model).collect()
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PortalError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PortalError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, PortalError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, PortalError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("count users by email")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &NewUser) -> Result<User, PortalError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(user.role.as_str().to_owned()),
            faculty: Set(user.faculty.clone()),
            supervisor_id: Set(None),
            supervisor_name: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        user_from_model(model)
    }

    async fn list_all(&self) -> Result<Vec<User>, PortalError> {
        self.list_where(sea_orm::Condition::all(), "list users")
            .await
    }

    async fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<User>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(users::Column::Role.is_in(role_names(roles))),
            "list users by role",
        )
        .await
    }

    async fn list_by_supervisor(&self, supervisor_id: UserId) -> Result<Vec<User>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(users::Column::SupervisorId.eq(supervisor_id.0)),
            "list users by supervisor",
        )
        .await
    }

    async fn count_by_roles(&self, roles: &[Role]) -> Result<u64, PortalError> {
        let count = users::Entity::find()
            .filter(users::Column::Role.is_in(role_names(roles)))
            .count(&self.db)
            .await
            .context("count users by role")?;
        Ok(count)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, PortalError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user for update")?
            .ok_or(PortalError::UserNotFound)?;
        let mut am = model.into_active_model();
        if let Some(ref email) = update.email {
            am.email = Set(email.clone());
        }
        if let Some(ref first_name) = update.first_name {
            am.first_name = Set(first_name.clone());
        }
        if let Some(ref last_name) = update.last_name {
            am.last_name = Set(last_name.clone());
        }
        if let Some(ref faculty) = update.faculty {
            am.faculty = Set(Some(faculty.clone()));
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update user profile")?;
        user_from_model(model)
    }

    async fn set_supervisor(
        &self,
        student_id: UserId,
        link: Option<&SupervisorLink>,
    ) -> Result<(), PortalError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::SupervisorId,
                Expr::value(link.map(|l| l.supervisor_id.0)),
            )
            .col_expr(
                users::Column::SupervisorName,
                Expr::value(link.map(|l| l.supervisor_name.clone())),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(student_id.0))
            .exec(&self.db)
            .await
            .context("set supervisor")?;
        if result.rows_affected == 0 {
            return Err(PortalError::UserNotFound);
        }
        Ok(())
    }

    async fn change_role(&self, id: UserId, role: Role) -> Result<Option<User>, PortalError> {
        let model = self
            .db
            .transaction::<_, Option<users::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = users::Entity::find_by_id(id.0).one(txn).await? else {
                        return Ok(None);
                    };
                    let mut am = model.into_active_model();
                    am.role = Set(role.as_str().to_owned());
                    if role != Role::Student {
                        am.supervisor_id = Set(None);
                        am.supervisor_name = Set(None);
                    }
                    am.updated_at = Set(Utc::now());
                    let model = am.update(txn).await?;

                    if !role.is_supervisory() {
                        users::Entity::update_many()
                            .col_expr(users::Column::SupervisorId, Expr::value(Option::<i64>::None))
                            .col_expr(
                                users::Column::SupervisorName,
                                Expr::value(Option::<String>::None),
                            )
                            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
                            .filter(users::Column::SupervisorId.eq(id.0))
                            .exec(txn)
                            .await?;
                        projects::Entity::update_many()
                            .col_expr(projects::Column::FacultyId, Expr::value(Option::<i64>::None))
                            .col_expr(projects::Column::UpdatedAt, Expr::value(Utc::now()))
                            .filter(projects::Column::FacultyId.eq(id.0))
                            .exec(txn)
                            .await?;
                    }
                    Ok(Some(model))
                })
            })
            .await
            .context("change user role")?;
        model.map(user_from_model).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, PortalError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    // Supervised students keep their accounts but lose the link.
                    users::Entity::update_many()
                        .col_expr(users::Column::SupervisorId, Expr::value(Option::<i64>::None))
                        .col_expr(
                            users::Column::SupervisorName,
                            Expr::value(Option::<String>::None),
                        )
                        .filter(users::Column::SupervisorId.eq(id.0))
                        .exec(txn)
                        .await?;
                    projects::Entity::update_many()
                        .col_expr(projects::Column::FacultyId, Expr::value(Option::<i64>::None))
                        .filter(projects::Column::FacultyId.eq(id.0))
                        .exec(txn)
                        .await?;
                    feedback::Entity::update_many()
                        .col_expr(feedback::Column::FacultyId, Expr::value(Option::<i64>::None))
                        .filter(feedback::Column::FacultyId.eq(id.0))
                        .exec(txn)
                        .await?;

                    // Owned projects go with their student.
                    let owned = Query::select()
                        .column(projects::Column::Id)
                        .from(projects::Entity)
                        .and_where(Expr::col(projects::Column::StudentId).eq(id.0))
                        .to_owned();
                    progress_updates::Entity::delete_many()
                        .filter(progress_updates::Column::ProjectId.in_subquery(owned.clone()))
                        .exec(txn)
                        .await?;
                    evaluations::Entity::delete_many()
                        .filter(evaluations::Column::ProjectId.in_subquery(owned.clone()))
                        .exec(txn)
                        .await?;
                    feedback::Entity::delete_many()
                        .filter(feedback::Column::ProjectId.in_subquery(owned))
                        .exec(txn)
                        .await?;
                    projects::Entity::delete_many()
                        .filter(projects::Column::StudentId.eq(id.0))
                        .exec(txn)
                        .await?;

                    let result = users::Entity::delete_by_id(id.0).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete user")?;
        Ok(deleted)
    }
}

fn user_from_model(model: users::Model) -> Result<User, PortalError> {
    let role: Role = model
        .role
        .parse()
        .with_context(|| format!("user {} has corrupt role", model.id))?;
    let supervisor = match (model.supervisor_id, model.supervisor_name) {
        (Some(supervisor_id), Some(supervisor_name)) => Some(SupervisorLink {
            supervisor_id: UserId(supervisor_id),
            supervisor_name,
        }),
        _ => None,
    };
    Ok(User {
        id: UserId(model.id),
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        role,
        faculty: model.faculty,
        supervisor,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Project repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProjectRepository {
    pub db: DatabaseConnection,
}

impl DbProjectRepository {
    async fn list_where(
        &self,
        filter: sea_orm::Condition,
        what: &'static str,
    ) -> Result<Vec<Project>, PortalError> {
        let models = projects::Entity::find()
            .filter(filter)
            .order_by_asc(projects::Column::Id)
            .all(&self.db)
            .await
            .context(what)?;
        models.into_iter().map(project_from_model).collect()
    }

    async fn update_column(
        &self,
        id: ProjectId,
        column: projects::Column,
        value: SimpleExpr,
        what: &'static str,
    ) -> Result<(), PortalError> {
        let result = projects::Entity::update_many()
            .col_expr(column, value)
            .col_expr(projects::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(projects::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context(what)?;
        if result.rows_affected == 0 {
            return Err(PortalError::ProjectNotFound);
        }
        Ok(())
    }
}

impl ProjectRepository for DbProjectRepository {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, PortalError> {
        let model = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find project by id")?;
        model.map(project_from_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Project>, PortalError> {
        self.list_where(sea_orm::Condition::all(), "list projects")
            .await
    }

    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<Project>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(projects::Column::StudentId.eq(student_id.0)),
            "list projects by student",
        )
        .await
    }

    async fn list_by_faculty(&self, faculty_id: UserId) -> Result<Vec<Project>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(projects::Column::FacultyId.eq(faculty_id.0)),
            "list projects by faculty",
        )
        .await
    }

    async fn list_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(projects::Column::Status.eq(status.as_str())),
            "list projects by status",
        )
        .await
    }

    async fn list_by_supervised_students(
        &self,
        supervisor_id: UserId,
    ) -> Result<Vec<Project>, PortalError> {
        let students = Query::select()
            .column(users::Column::Id)
            .from(users::Entity)
            .and_where(Expr::col(users::Column::SupervisorId).eq(supervisor_id.0))
            .to_owned();
        self.list_where(
            sea_orm::Condition::all().add(projects::Column::StudentId.in_subquery(students)),
            "list projects of supervised students",
        )
        .await
    }

    async fn list_without_faculty(&self) -> Result<Vec<Project>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(projects::Column::FacultyId.is_null()),
            "list projects without faculty",
        )
        .await
    }

    async fn count(&self) -> Result<u64, PortalError> {
        let count = projects::Entity::find()
            .count(&self.db)
            .await
            .context("count projects")?;
        Ok(count)
    }

    async fn count_by_status(&self, status: ProjectStatus) -> Result<u64, PortalError> {
        let count = projects::Entity::find()
            .filter(projects::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .context("count projects by status")?;
        Ok(count)
    }

    async fn create(&self, project: &NewProject) -> Result<Project, PortalError> {
        let now = Utc::now();
        let d = &project.details;
        let model = projects::ActiveModel {
            title: Set(project.title.clone()),
            description: Set(d.description.clone()),
            objective: Set(d.objective.clone()),
            tools: Set(d.tools.clone()),
            category: Set(d.category.clone()),
            github_link: Set(d.github_link.clone()),
            status: Set(ProjectStatus::Pending.as_str().to_owned()),
            student_id: Set(project.student_id.0),
            faculty_id: Set(project.faculty_id.map(|f| f.0)),
            progress: Set(d.progress.unwrap_or(0)),
            start_date: Set(d.start_date),
            end_date: Set(d.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create project")?;
        project_from_model(model)
    }

    async fn update_details(
        &self,
        id: ProjectId,
        details: &ProjectDetails,
    ) -> Result<Project, PortalError> {
        let model = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find project for update")?
            .ok_or(PortalError::ProjectNotFound)?;
        let mut am = model.into_active_model();
        if let Some(ref title) = details.title {
            am.title = Set(title.clone());
        }
        if details.description.is_some() {
            am.description = Set(details.description.clone());
        }
        if details.objective.is_some() {
            am.objective = Set(details.objective.clone());
        }
        if details.tools.is_some() {
            am.tools = Set(details.tools.clone());
        }
        if details.category.is_some() {
            am.category = Set(details.category.clone());
        }
        if details.github_link.is_some() {
            am.github_link = Set(details.github_link.clone());
        }
        if let Some(progress) = details.progress {
            am.progress = Set(progress);
        }
        if details.start_date.is_some() {
            am.start_date = Set(details.start_date);
        }
        if details.end_date.is_some() {
            am.end_date = Set(details.end_date);
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update project")?;
        project_from_model(model)
    }

    async fn set_status(&self, id: ProjectId, status: ProjectStatus) -> Result<(), PortalError> {
        self.update_column(
            id,
            projects::Column::Status,
            Expr::value(status.as_str()),
            "set project status",
        )
        .await
    }

    async fn set_faculty(&self, id: ProjectId, faculty_id: UserId) -> Result<(), PortalError> {
        self.update_column(
            id,
            projects::Column::FacultyId,
            Expr::value(faculty_id.0),
            "set project faculty",
        )
        .await
    }

    async fn set_end_date(&self, id: ProjectId, end_date: NaiveDate) -> Result<(), PortalError> {
        self.update_column(
            id,
            projects::Column::EndDate,
            Expr::value(end_date),
            "set project end date",
        )
        .await
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, PortalError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    progress_updates::Entity::delete_many()
                        .filter(progress_updates::Column::ProjectId.eq(id.0))
                        .exec(txn)
                        .await?;
                    evaluations::Entity::delete_many()
                        .filter(evaluations::Column::ProjectId.eq(id.0))
                        .exec(txn)
                        .await?;
                    feedback::Entity::delete_many()
                        .filter(feedback::Column::ProjectId.eq(id.0))
                        .exec(txn)
                        .await?;
                    let result = projects::Entity::delete_by_id(id.0).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete project")?;
        Ok(deleted)
    }
}

fn project_from_model(model: projects::Model) -> Result<Project, PortalError> {
    let status: ProjectStatus = model
        .status
        .parse()
        .with_context(|| format!("project {} has corrupt status", model.id))?;
    Ok(Project {
        id: ProjectId(model.id),
        title: model.title,
        description: model.description,
        objective: model.objective,
        tools: model.tools,
        category: model.category,
        github_link: model.github_link,
        status,
        student_id: UserId(model.student_id),
        faculty_id: model.faculty_id.map(UserId),
        progress: model.progress,
        start_date: model.start_date,
        end_date: model.end_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Progress update repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProgressUpdateRepository {
    pub db: DatabaseConnection,
}

impl ProgressUpdateRepository for DbProgressUpdateRepository {
    async fn find_by_id(&self, id: ProgressUpdateId) -> Result<Option<ProgressUpdate>, PortalError> {
        let model = progress_updates::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find progress update by id")?;
        Ok(model.map(progress_update_from_model))
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProgressUpdate>, PortalError> {
        let models = progress_updates::Entity::find()
            .filter(progress_updates::Column::ProjectId.eq(project_id.0))
            .order_by_asc(progress_updates::Column::WeekNumber)
            .all(&self.db)
            .await
            .context("list progress updates by project")?;
        Ok(models.into_iter().map(progress_update_from_model).collect())
    }

    async fn find_by_project_week(
        &self,
        project_id: ProjectId,
        week_number: i32,
    ) -> Result<Option<ProgressUpdate>, PortalError> {
        let model = progress_updates::Entity::find()
            .filter(progress_updates::Column::ProjectId.eq(project_id.0))
            .filter(progress_updates::Column::WeekNumber.eq(week_number))
            .one(&self.db)
            .await
            .context("find progress update by week")?;
        Ok(model.map(progress_update_from_model))
    }

    async fn count_by_project(&self, project_id: ProjectId) -> Result<u64, PortalError> {
        let count = progress_updates::Entity::find()
            .filter(progress_updates::Column::ProjectId.eq(project_id.0))
            .count(&self.db)
            .await
            .context("count progress updates")?;
        Ok(count)
    }

    async fn create_with_status(
        &self,
        update: &NewProgressUpdate,
        advance_to: Option<ProjectStatus>,
    ) -> Result<ProgressUpdate, PortalError> {
        let am = progress_updates::ActiveModel {
            project_id: Set(update.project_id.0),
            week_number: Set(update.week_number),
            description: Set(update.description.clone()),
            feedback: Set(update.feedback.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let project_id = update.project_id.0;
        let result = self
            .db
            .transaction::<_, progress_updates::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let model = am.insert(txn).await?;
                    if let Some(status) = advance_to {
                        projects::Entity::update_many()
                            .col_expr(projects::Column::Status, Expr::value(status.as_str()))
                            .col_expr(projects::Column::UpdatedAt, Expr::value(Utc::now()))
                            .filter(projects::Column::Id.eq(project_id))
                            .exec(txn)
                            .await?;
                    }
                    Ok(model)
                })
            })
            .await;
        match result {
            Ok(model) => Ok(progress_update_from_model(model)),
            // Lost a race with a concurrent insert for the same week.
            Err(TransactionError::Transaction(ref e))
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                Err(PortalError::validation(format!(
                    "Progress update for week {} already exists for this project",
                    update.week_number
                )))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("create progress update")
                .into()),
        }
    }

    async fn update(
        &self,
        id: ProgressUpdateId,
        edit: &ProgressUpdateEdit,
    ) -> Result<ProgressUpdate, PortalError> {
        let model = progress_updates::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find progress update for update")?
            .ok_or(PortalError::ProgressUpdateNotFound)?;
        let mut am = model.into_active_model();
        if let Some(week) = edit.week_number {
            am.week_number = Set(week);
        }
        if let Some(ref description) = edit.description {
            am.description = Set(description.clone());
        }
        if edit.feedback.is_some() {
            am.feedback = Set(edit.feedback.clone());
        }
        let model = am.update(&self.db).await.context("update progress update")?;
        Ok(progress_update_from_model(model))
    }

    async fn delete(&self, id: ProgressUpdateId) -> Result<bool, PortalError> {
        let result = progress_updates::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete progress update")?;
        Ok(result.rows_affected > 0)
    }
}

fn progress_update_from_model(model: progress_updates::Model) -> ProgressUpdate {
    ProgressUpdate {
        id: ProgressUpdateId(model.id),
        project_id: ProjectId(model.project_id),
        week_number: model.week_number,
        description: model.description,
        feedback: model.feedback,
        created_at: model.created_at,
    }
}

// ── Evaluation repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEvaluationRepository {
    pub db: DatabaseConnection,
}

impl EvaluationRepository for DbEvaluationRepository {
    async fn find_by_id(&self, id: EvaluationId) -> Result<Option<Evaluation>, PortalError> {
        let model = evaluations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find evaluation by id")?;
        Ok(model.map(evaluation_from_model))
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Evaluation>, PortalError> {
        let models = evaluations::Entity::find()
            .filter(evaluations::Column::ProjectId.eq(project_id.0))
            .order_by_desc(evaluations::Column::CreatedAt)
            .order_by_desc(evaluations::Column::Id)
            .all(&self.db)
            .await
            .context("list evaluations by project")?;
        Ok(models.into_iter().map(evaluation_from_model).collect())
    }

    async fn average_score(&self, project_id: ProjectId) -> Result<Option<f64>, PortalError> {
        let scores: Vec<i32> = self
            .list_by_project(project_id)
            .await?
            .into_iter()
            .map(|e| e.final_score)
            .collect();
        if scores.is_empty() {
            return Ok(None);
        }
        let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        Ok(Some(sum as f64 / scores.len() as f64))
    }

    async fn create(
        &self,
        project_id: ProjectId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError> {
        let model = evaluations::ActiveModel {
            project_id: Set(project_id.0),
            final_score: Set(final_score),
            comment: Set(comment.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create evaluation")?;
        Ok(evaluation_from_model(model))
    }

    async fn update(
        &self,
        id: EvaluationId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError> {
        let model = evaluations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find evaluation for update")?
            .ok_or(PortalError::EvaluationNotFound)?;
        let mut am = model.into_active_model();
        am.final_score = Set(final_score);
        am.comment = Set(comment.to_owned());
        let model = am.update(&self.db).await.context("update evaluation")?;
        Ok(evaluation_from_model(model))
    }

    async fn delete(&self, id: EvaluationId) -> Result<bool, PortalError> {
        let result = evaluations::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete evaluation")?;
        Ok(result.rows_affected > 0)
    }
}

fn evaluation_from_model(model: evaluations::Model) -> Evaluation {
    Evaluation {
        id: EvaluationId(model.id),
        project_id: ProjectId(model.project_id),
        final_score: model.final_score,
        comment: model.comment,
        created_at: model.created_at,
    }
}

// ── Feedback repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFeedbackRepository {
    pub db: DatabaseConnection,
}

impl DbFeedbackRepository {
    async fn list_where(
        &self,
        filter: sea_orm::Condition,
        what: &'static str,
    ) -> Result<Vec<Feedback>, PortalError> {
        let models = feedback::Entity::find()
            .filter(filter)
            .order_by_desc(feedback::Column::CreatedAt)
            .order_by_desc(feedback::Column::Id)
            .all(&self.db)
            .await
            .context(what)?;
        Ok(models.into_iter().map(feedback_from_model).collect())
    }
}

impl FeedbackRepository for DbFeedbackRepository {
    async fn find_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, PortalError> {
        let model = feedback::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find feedback by id")?;
        Ok(model.map(feedback_from_model))
    }

    async fn list_all(&self) -> Result<Vec<Feedback>, PortalError> {
        self.list_where(sea_orm::Condition::all(), "list feedback")
            .await
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Feedback>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(feedback::Column::ProjectId.eq(project_id.0)),
            "list feedback by project",
        )
        .await
    }

    async fn list_by_faculty(&self, faculty_id: UserId) -> Result<Vec<Feedback>, PortalError> {
        self.list_where(
            sea_orm::Condition::all().add(feedback::Column::FacultyId.eq(faculty_id.0)),
            "list feedback by faculty",
        )
        .await
    }

    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<Feedback>, PortalError> {
        let owned = Query::select()
            .column(projects::Column::Id)
            .from(projects::Entity)
            .and_where(Expr::col(projects::Column::StudentId).eq(student_id.0))
            .to_owned();
        self.list_where(
            sea_orm::Condition::all().add(feedback::Column::ProjectId.in_subquery(owned)),
            "list feedback by student",
        )
        .await
    }

    async fn create(
        &self,
        project_id: ProjectId,
        faculty_id: UserId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError> {
        let model = feedback::ActiveModel {
            project_id: Set(project_id.0),
            faculty_id: Set(Some(faculty_id.0)),
            comment: Set(comment.to_owned()),
            rating: Set(rating),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create feedback")?;
        Ok(feedback_from_model(model))
    }

    async fn update(
        &self,
        id: FeedbackId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError> {
        let model = feedback::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find feedback for update")?
            .ok_or(PortalError::FeedbackNotFound)?;
        let mut am = model.into_active_model();
        am.comment = Set(comment.to_owned());
        am.rating = Set(rating);
        let model = am.update(&self.db).await.context("update feedback")?;
        Ok(feedback_from_model(model))
    }

    async fn delete(&self, id: FeedbackId) -> Result<bool, PortalError> {
        let result = feedback::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete feedback")?;
        Ok(result.rows_affected > 0)
    }
}

fn feedback_from_model(model: feedback::Model) -> Feedback {
    Feedback {
        id: FeedbackId(model.id),
        project_id: ProjectId(model.project_id),
        faculty_id: model.faculty_id.map(UserId),
        comment: model.comment,
        rating: model.rating,
        created_at: model.created_at,
    }
}
