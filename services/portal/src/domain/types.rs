use chrono::{DateTime, NaiveDate, Utc};

use portal_domain::id::{EvaluationId, FeedbackId, ProgressUpdateId, ProjectId, UserId};
use portal_domain::project::ProjectStatus;
use portal_domain::user::{Role, full_name};

/// Roles that may supervise students. FACULTY is kept as an alias of SUPERVISOR.
pub const SUPERVISORY_ROLES: [Role; 2] = [Role::Supervisor, Role::Faculty];

/// A student's supervisor reference together with the display name captured when
/// the assignment was made. The name is a snapshot and does not follow renames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorLink {
    pub supervisor_id: UserId,
    pub supervisor_name: String,
}

impl SupervisorLink {
    pub fn to(supervisor: &User) -> Self {
        Self {
            supervisor_id: supervisor.id,
            supervisor_name: supervisor.full_name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Free-text department label. Unrelated to `Role::Faculty`.
    pub faculty: Option<String>,
    pub supervisor: Option<SupervisorLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn supervisor_id(&self) -> Option<UserId> {
        self.supervisor.as_ref().map(|s| s.supervisor_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub faculty: Option<String>,
}

/// Admin profile edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub faculty: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub tools: Option<String>,
    pub category: Option<String>,
    pub github_link: Option<String>,
    pub status: ProjectStatus,
    pub student_id: UserId,
    pub faculty_id: Option<UserId>,
    pub progress: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Descriptive project fields shared by submission and edit.
#[derive(Debug, Clone, Default)]
pub struct ProjectDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub tools: Option<String>,
    pub category: Option<String>,
    pub github_link: Option<String>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub details: ProjectDetails,
    pub student_id: UserId,
    pub faculty_id: Option<UserId>,
}

#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub id: ProgressUpdateId,
    pub project_id: ProjectId,
    pub week_number: i32,
    pub description: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProgressUpdate {
    pub project_id: ProjectId,
    pub week_number: i32,
    pub description: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressUpdateEdit {
    pub week_number: Option<i32>,
    pub description: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub project_id: ProjectId,
    pub final_score: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Feedback {
    pub id: FeedbackId,
    pub project_id: ProjectId,
    pub faculty_id: Option<UserId>,
    pub comment: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_supervisors: u64,
    pub total_projects: u64,
    pub pending_projects: u64,
    pub completed_projects: u64,
    /// Completed projects as a percentage of all projects, 0.0 when there are none.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectProgressSummary {
    pub project_id: ProjectId,
    pub progress: i32,
    pub status: ProjectStatus,
    pub progress_update_count: u64,
    pub average_score: f64,
}

pub fn validate_percentage(field: &str, value: i32) -> Result<(), String> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be between 0 and 100"))
    }
}

pub fn validate_rating(value: i32) -> Result<(), String> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err("Rating must be between 1 and 5".to_owned())
    }
}

pub fn validate_week_number(value: i32) -> Result<(), String> {
    if value >= 1 {
        Ok(())
    } else {
        Err("Week number must be at least 1".to_owned())
    }
}
