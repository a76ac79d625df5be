//! In-memory repositories for use-case unit tests.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use portal_domain::id::{EvaluationId, FeedbackId, ProgressUpdateId, ProjectId, UserId};
use portal_domain::project::ProjectStatus;
use portal_domain::user::Role;

use crate::domain::repository::{
    EvaluationRepository, FeedbackRepository, ProgressUpdateRepository, ProjectRepository,
    UserRepository,
};
use crate::domain::types::{
    Evaluation, Feedback, NewProgressUpdate, NewProject, NewUser, ProgressUpdate,
    ProgressUpdateEdit, Project, ProjectDetails, SupervisorLink, User, UserProfileUpdate,
};
use crate::error::PortalError;

pub fn user(id: i64, username: &str, role: Role) -> User {
    User {
        id: UserId(id),
        username: username.into(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        first_name: capitalize(username),
        last_name: "Tester".into(),
        role,
        faculty: None,
        supervisor: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn project_with_status(id: i64, status: ProjectStatus) -> Project {
    Project {
        id: ProjectId(id),
        title: format!("Project {id}"),
        description: None,
        objective: None,
        tools: None,
        category: None,
        github_link: None,
        status,
        student_id: UserId(1),
        faculty_id: None,
        progress: 0,
        start_date: None,
        end_date: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PortalError> {
        Ok(self.get(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PortalError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, PortalError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, PortalError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn create(&self, new: &NewUser) -> Result<User, PortalError> {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = User {
            id: UserId(id),
            username: new.username.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            role: new.role,
            faculty: new.faculty.clone(),
            supervisor: None,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<User>, PortalError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<User>, PortalError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| roles.contains(&u.role))
            .cloned()
            .collect())
    }

    async fn list_by_supervisor(&self, supervisor_id: UserId) -> Result<Vec<User>, PortalError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.supervisor_id() == Some(supervisor_id))
            .cloned()
            .collect())
    }

    async fn count_by_roles(&self, roles: &[Role]) -> Result<u64, PortalError> {
        Ok(self.list_by_roles(roles).await?.len() as u64)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, PortalError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(PortalError::UserNotFound)?;
        if let Some(ref email) = update.email {
            user.email = email.clone();
        }
        if let Some(ref first_name) = update.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(ref last_name) = update.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(ref faculty) = update.faculty {
            user.faculty = Some(faculty.clone());
        }
        Ok(user.clone())
    }

    async fn change_role(&self, id: UserId, role: Role) -> Result<Option<User>, PortalError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.role = role;
        if role != Role::Student {
            user.supervisor = None;
        }
        let changed = user.clone();
        if !role.is_supervisory() {
            for u in users.iter_mut() {
                if u.supervisor_id() == Some(id) {
                    u.supervisor = None;
                }
            }
        }
        Ok(Some(changed))
    }

    async fn set_supervisor(
        &self,
        student_id: UserId,
        link: Option<&SupervisorLink>,
    ) -> Result<(), PortalError> {
        let mut users = self.users.lock().unwrap();
        let student = users
            .iter_mut()
            .find(|u| u.id == student_id)
            .ok_or(PortalError::UserNotFound)?;
        student.supervisor = link.cloned();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, PortalError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        for u in users.iter_mut() {
            if u.supervisor_id() == Some(id) {
                u.supervisor = None;
            }
        }
        Ok(users.len() != before)
    }
}

// ── Projects ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProjectRepo {
    pub projects: Arc<Mutex<Vec<Project>>>,
}

impl MockProjectRepo {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
        }
    }

    pub fn get(&self, id: ProjectId) -> Option<Project> {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn status_of(&self, id: ProjectId) -> Option<ProjectStatus> {
        self.get(id).map(|p| p.status)
    }

    fn filtered(&self, pred: impl Fn(&Project) -> bool) -> Vec<Project> {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| pred(p))
            .cloned()
            .collect()
    }

    fn modify(&self, id: ProjectId, f: impl FnOnce(&mut Project)) -> Result<Project, PortalError> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PortalError::ProjectNotFound)?;
        f(project);
        Ok(project.clone())
    }
}

impl ProjectRepository for MockProjectRepo {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, PortalError> {
        Ok(self.get(id))
    }

    async fn list_all(&self) -> Result<Vec<Project>, PortalError> {
        Ok(self.filtered(|_| true))
    }

    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<Project>, PortalError> {
        Ok(self.filtered(|p| p.student_id == student_id))
    }

    async fn list_by_faculty(&self, faculty_id: UserId) -> Result<Vec<Project>, PortalError> {
        Ok(self.filtered(|p| p.faculty_id == Some(faculty_id)))
    }

    async fn list_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, PortalError> {
        Ok(self.filtered(|p| p.status == status))
    }

    async fn list_by_supervised_students(
        &self,
        _supervisor_id: UserId,
    ) -> Result<Vec<Project>, PortalError> {
        Ok(vec![])
    }

    async fn list_without_faculty(&self) -> Result<Vec<Project>, PortalError> {
        Ok(self.filtered(|p| p.faculty_id.is_none()))
    }

    async fn count(&self) -> Result<u64, PortalError> {
        Ok(self.projects.lock().unwrap().len() as u64)
    }

    async fn count_by_status(&self, status: ProjectStatus) -> Result<u64, PortalError> {
        Ok(self.filtered(|p| p.status == status).len() as u64)
    }

    async fn create(&self, new: &NewProject) -> Result<Project, PortalError> {
        let mut projects = self.projects.lock().unwrap();
        let id = projects.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let d = &new.details;
        let created = Project {
            id: ProjectId(id),
            title: new.title.clone(),
            description: d.description.clone(),
            objective: d.objective.clone(),
            tools: d.tools.clone(),
            category: d.category.clone(),
            github_link: d.github_link.clone(),
            status: ProjectStatus::Pending,
            student_id: new.student_id,
            faculty_id: new.faculty_id,
            progress: d.progress.unwrap_or(0),
            start_date: d.start_date,
            end_date: d.end_date,
            created_at: now,
            updated_at: now,
        };
        projects.push(created.clone());
        Ok(created)
    }

    async fn update_details(
        &self,
        id: ProjectId,
        details: &ProjectDetails,
    ) -> Result<Project, PortalError> {
        self.modify(id, |p| {
            if let Some(ref title) = details.title {
                p.title = title.clone();
            }
            if let Some(ref description) = details.description {
                p.description = Some(description.clone());
            }
            if let Some(progress) = details.progress {
                p.progress = progress;
            }
            if let Some(end_date) = details.end_date {
                p.end_date = Some(end_date);
            }
        })
    }

    async fn set_status(&self, id: ProjectId, status: ProjectStatus) -> Result<(), PortalError> {
        self.modify(id, |p| p.status = status).map(|_| ())
    }

    async fn set_faculty(&self, id: ProjectId, faculty_id: UserId) -> Result<(), PortalError> {
        self.modify(id, |p| p.faculty_id = Some(faculty_id))
            .map(|_| ())
    }

    async fn set_end_date(&self, id: ProjectId, end_date: NaiveDate) -> Result<(), PortalError> {
        self.modify(id, |p| p.end_date = Some(end_date)).map(|_| ())
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, PortalError> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() != before)
    }
}

// ── Progress updates ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProgressRepo {
    pub updates: Arc<Mutex<Vec<ProgressUpdate>>>,
    /// Shared with the project repo so status advances are observable.
    pub projects: MockProjectRepo,
}

impl MockProgressRepo {
    pub fn new(projects: MockProjectRepo) -> Self {
        Self {
            updates: Arc::default(),
            projects,
        }
    }

    pub fn stored(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

impl ProgressUpdateRepository for MockProgressRepo {
    async fn find_by_id(&self, id: ProgressUpdateId) -> Result<Option<ProgressUpdate>, PortalError> {
        Ok(self
            .updates
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProgressUpdate>, PortalError> {
        let mut list: Vec<_> = self
            .updates
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.project_id == project_id)
            .cloned()
            .collect();
        list.sort_by_key(|u| u.week_number);
        Ok(list)
    }

    async fn find_by_project_week(
        &self,
        project_id: ProjectId,
        week_number: i32,
    ) -> Result<Option<ProgressUpdate>, PortalError> {
        Ok(self
            .updates
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.project_id == project_id && u.week_number == week_number)
            .cloned())
    }

    async fn count_by_project(&self, project_id: ProjectId) -> Result<u64, PortalError> {
        Ok(self.list_by_project(project_id).await?.len() as u64)
    }

    async fn create_with_status(
        &self,
        new: &NewProgressUpdate,
        advance_to: Option<ProjectStatus>,
    ) -> Result<ProgressUpdate, PortalError> {
        if let Some(status) = advance_to {
            self.projects.set_status(new.project_id, status).await?;
        }
        let mut updates = self.updates.lock().unwrap();
        let id = updates.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let created = ProgressUpdate {
            id: ProgressUpdateId(id),
            project_id: new.project_id,
            week_number: new.week_number,
            description: new.description.clone(),
            feedback: new.feedback.clone(),
            created_at: Utc::now(),
        };
        updates.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: ProgressUpdateId,
        edit: &ProgressUpdateEdit,
    ) -> Result<ProgressUpdate, PortalError> {
        let mut updates = self.updates.lock().unwrap();
        let update = updates
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(PortalError::ProgressUpdateNotFound)?;
        if let Some(week) = edit.week_number {
            update.week_number = week;
        }
        if let Some(ref description) = edit.description {
            update.description = description.clone();
        }
        if let Some(ref feedback) = edit.feedback {
            update.feedback = Some(feedback.clone());
        }
        Ok(update.clone())
    }

    async fn delete(&self, id: ProgressUpdateId) -> Result<bool, PortalError> {
        let mut updates = self.updates.lock().unwrap();
        let before = updates.len();
        updates.retain(|u| u.id != id);
        Ok(updates.len() != before)
    }
}

// ── Evaluations ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockEvaluationRepo {
    pub evaluations: Arc<Mutex<Vec<Evaluation>>>,
}

impl EvaluationRepository for MockEvaluationRepo {
    async fn find_by_id(&self, id: EvaluationId) -> Result<Option<Evaluation>, PortalError> {
        Ok(self
            .evaluations
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Evaluation>, PortalError> {
        let mut list: Vec<_> = self
            .evaluations
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(list)
    }

    async fn average_score(&self, project_id: ProjectId) -> Result<Option<f64>, PortalError> {
        let list = self.list_by_project(project_id).await?;
        if list.is_empty() {
            return Ok(None);
        }
        let sum: i64 = list.iter().map(|e| i64::from(e.final_score)).sum();
        Ok(Some(sum as f64 / list.len() as f64))
    }

    async fn create(
        &self,
        project_id: ProjectId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError> {
        let mut evaluations = self.evaluations.lock().unwrap();
        let id = evaluations.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
        let created = Evaluation {
            id: EvaluationId(id),
            project_id,
            final_score,
            comment: comment.to_owned(),
            created_at: Utc::now(),
        };
        evaluations.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: EvaluationId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError> {
        let mut evaluations = self.evaluations.lock().unwrap();
        let evaluation = evaluations
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(PortalError::EvaluationNotFound)?;
        evaluation.final_score = final_score;
        evaluation.comment = comment.to_owned();
        Ok(evaluation.clone())
    }

    async fn delete(&self, id: EvaluationId) -> Result<bool, PortalError> {
        let mut evaluations = self.evaluations.lock().unwrap();
        let before = evaluations.len();
        evaluations.retain(|e| e.id != id);
        Ok(evaluations.len() != before)
    }
}

// ── Feedback ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockFeedbackRepo {
    pub feedback: Arc<Mutex<Vec<Feedback>>>,
    pub projects: MockProjectRepo,
}

impl MockFeedbackRepo {
    fn filtered(&self, pred: impl Fn(&Feedback) -> bool) -> Vec<Feedback> {
        self.feedback
            .lock()
            .unwrap()
            .iter()
            .filter(|f| pred(f))
            .cloned()
            .collect()
    }
}

impl FeedbackRepository for MockFeedbackRepo {
    async fn find_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, PortalError> {
        Ok(self.filtered(|f| f.id == id).into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<Feedback>, PortalError> {
        Ok(self.filtered(|_| true))
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Feedback>, PortalError> {
        Ok(self.filtered(|f| f.project_id == project_id))
    }

    async fn list_by_faculty(&self, faculty_id: UserId) -> Result<Vec<Feedback>, PortalError> {
        Ok(self.filtered(|f| f.faculty_id == Some(faculty_id)))
    }

    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<Feedback>, PortalError> {
        let owned: Vec<ProjectId> = self
            .projects
            .list_by_student(student_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        Ok(self.filtered(|f| owned.contains(&f.project_id)))
    }

    async fn create(
        &self,
        project_id: ProjectId,
        faculty_id: UserId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError> {
        let mut feedback = self.feedback.lock().unwrap();
        let id = feedback.iter().map(|f| f.id.0).max().unwrap_or(0) + 1;
        let created = Feedback {
            id: FeedbackId(id),
            project_id,
            faculty_id: Some(faculty_id),
            comment: comment.to_owned(),
            rating,
            created_at: Utc::now(),
        };
        feedback.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: FeedbackId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError> {
        let mut feedback = self.feedback.lock().unwrap();
        let entry = feedback
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(PortalError::FeedbackNotFound)?;
        entry.comment = comment.to_owned();
        entry.rating = rating;
        Ok(entry.clone())
    }

    async fn delete(&self, id: FeedbackId) -> Result<bool, PortalError> {
        let mut feedback = self.feedback.lock().unwrap();
        let before = feedback.len();
        feedback.retain(|f| f.id != id);
        Ok(feedback.len() != before)
    }
}
