//! In-memory adapter. Enforces the same uniqueness and cascade rules as the
//! PostgreSQL schema so the HTTP layer behaves identically on top of it.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, CompanyRepository, JobRepository, SavedJobRepository,
    SessionRepository, UserRepository,
};
use crate::error::{Error, Result};
use crate::models::{
    application::{ApplicantView, Application, ApplicationStatus, NewApplication},
    company::{Company, CompanyChanges},
    job::{Job, JobChanges, JobFilter, JobListing, NewJob},
    saved_job::SavedJob,
    session::{NewSession, Session},
    user::{NewUser, ProfileChanges, User},
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    companies: HashMap<Uuid, Company>,
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
    saved_jobs: HashMap<Uuid, SavedJob>,
    sessions: HashMap<Uuid, Session>,
}

impl Tables {
    fn listing(&self, job: &Job) -> Option<JobListing> {
        let company = self.companies.get(&job.company_id)?;
        let application_count = self
            .applications
            .values()
            .filter(|a| a.job_id == job.id)
            .count() as i64;
        Some(JobListing {
            job: job.clone(),
            company_name: company.name.clone(),
            company_logo_url: company.logo_url.clone(),
            company_location: company.location.clone(),
            application_count,
        })
    }

    fn matches(&self, job: &Job, filter: &JobFilter) -> bool {
        if filter.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if filter.company_id.is_some_and(|c| c != job.company_id) {
            return false;
        }
        if let Some(q) = &filter.query {
            let company_name = self
                .companies
                .get(&job.company_id)
                .map(|c| c.name.as_str())
                .unwrap_or_default();
            if !contains_ci(&job.title, q)
                && !contains_ci(&job.description, q)
                && !contains_ci(company_name, q)
            {
                return false;
            }
        }
        if let Some(location) = &filter.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        if !filter.location_types.is_empty() && !filter.location_types.contains(&job.location_type) {
            return false;
        }
        if !filter.experience_levels.is_empty()
            && !filter.experience_levels.contains(&job.experience_level)
        {
            return false;
        }
        if !filter.job_types.is_empty() && !filter.job_types.contains(&job.job_type) {
            return false;
        }
        true
    }

    fn remove_job(&mut self, id: Uuid) -> bool {
        let removed = self.jobs.remove(&id).is_some();
        if removed {
            self.applications.retain(|_, a| a.job_id != id);
            self.saved_jobs.retain(|_, s| s.job_id != id);
        }
        removed
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Process-local store, cheap to clone and share between tasks.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn saved_job_count(&self) -> usize {
        self.tables.read().await.saved_jobs.len()
    }

    pub async fn application_count(&self) -> usize {
        self.tables.read().await.applications.len()
    }

    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }

    pub async fn job_count(&self) -> usize {
        self.tables.read().await.jobs.len()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create(
        &self,
        user: NewUser,
        company_name: Option<String>,
    ) -> Result<(User, Option<Company>)> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict("Resource already exists".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            headline: None,
            bio: None,
            location: None,
            skills: Vec::new(),
            portfolio_url: None,
            resume_url: None,
            created_at: now,
            updated_at: now,
        };
        let company = company_name.map(|name| Company {
            id: Uuid::new_v4(),
            user_id: created.id,
            name,
            description: None,
            website: None,
            logo_url: None,
            location: None,
            industry: None,
            size: None,
            created_at: now,
            updated_at: now,
        });
        tables.users.insert(created.id, created.clone());
        if let Some(c) = &company {
            tables.companies.insert(c.id, c.clone());
        }
        Ok((created, company))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        changes.apply(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl CompanyRepository for MemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.values().find(|c| c.user_id == user_id).cloned())
    }

    async fn update(&self, id: Uuid, changes: CompanyChanges) -> Result<Company> {
        let mut tables = self.tables.write().await;
        let company = tables
            .companies
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Company not found".to_string()))?;
        changes.apply(company);
        company.updated_at = Utc::now();
        Ok(company.clone())
    }
}

#[async_trait]
impl JobRepository for MemoryRepository {
    async fn create(&self, job: NewJob) -> Result<Job> {
        let mut tables = self.tables.write().await;
        if !tables.companies.contains_key(&job.company_id) {
            return Err(Error::NotFound("Company not found".to_string()));
        }
        let now = Utc::now();
        let created = Job {
            id: Uuid::new_v4(),
            company_id: job.company_id,
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            responsibilities: job.responsibilities,
            skills: job.skills,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            currency: job.currency,
            location: job.location,
            location_type: job.location_type,
            job_type: job.job_type,
            experience_level: job.experience_level,
            status: job.status,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.get(&id).and_then(|job| tables.listing(job)))
    }

    async fn increment_views(&self, id: Uuid) -> Result<i64> {
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        job.views += 1;
        Ok(job.views)
    }

    async fn search(&self, filter: JobFilter) -> Result<(Vec<JobListing>, i64)> {
        let tables = self.tables.read().await;
        let mut matched: Vec<&Job> = tables
            .jobs
            .values()
            .filter(|job| tables.matches(job, &filter))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .filter_map(|job| tables.listing(job))
            .collect();
        Ok((items, total))
    }

    async fn listings_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<JobListing>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.jobs.get(id))
            .filter_map(|job| tables.listing(job))
            .collect())
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Job> {
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        changes.apply(job);
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.remove_job(id))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepository {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&application.user_id) {
            return Err(Error::NotFound("User not found".to_string()));
        }
        if !tables.jobs.contains_key(&application.job_id) {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        if tables
            .applications
            .values()
            .any(|a| a.user_id == application.user_id && a.job_id == application.job_id)
        {
            return Err(Error::Conflict("Already applied to this job".to_string()));
        }
        let now = Utc::now();
        let created = Application {
            id: Uuid::new_v4(),
            user_id: application.user_id,
            job_id: application.job_id,
            status: ApplicationStatus::Pending,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            created_at: now,
            updated_at: now,
        };
        tables.applications.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.tables.read().await.applications.get(&id).cloned())
    }

    async fn find_for_user_and_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .values()
            .find(|a| a.user_id == user_id && a.job_id == job_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        let mut items: Vec<Application> = tables
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicantView>> {
        let tables = self.tables.read().await;
        let mut items: Vec<ApplicantView> = tables
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .filter_map(|a| {
                let user = tables.users.get(&a.user_id)?;
                Some(ApplicantView {
                    application: a.clone(),
                    applicant_name: user.name.clone(),
                    applicant_email: user.email.clone(),
                    applicant_headline: user.headline.clone(),
                    applicant_skills: user.skills.clone(),
                    applicant_portfolio_url: user.portfolio_url.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| b.application.created_at.cmp(&a.application.created_at));
        Ok(items)
    }

    async fn update_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Application> {
        let mut tables = self.tables.write().await;
        let application = tables
            .applications
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        application.status = status;
        application.updated_at = Utc::now();
        Ok(application.clone())
    }
}

#[async_trait]
impl SavedJobRepository for MemoryRepository {
    async fn create(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(Error::NotFound("User not found".to_string()));
        }
        if !tables.jobs.contains_key(&job_id) {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        if tables
            .saved_jobs
            .values()
            .any(|s| s.user_id == user_id && s.job_id == job_id)
        {
            return Err(Error::Conflict("Job already saved".to_string()));
        }
        let saved = SavedJob {
            id: Uuid::new_v4(),
            user_id,
            job_id,
            created_at: Utc::now(),
        };
        tables.saved_jobs.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn find(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<SavedJob>> {
        let tables = self.tables.read().await;
        Ok(tables
            .saved_jobs
            .values()
            .find(|s| s.user_id == user_id && s.job_id == job_id)
            .cloned())
    }

    async fn delete(&self, user_id: Uuid, job_id: Uuid) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.saved_jobs.len();
        tables
            .saved_jobs
            .retain(|_, s| !(s.user_id == user_id && s.job_id == job_id));
        Ok((before - tables.saved_jobs.len()) as u64)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SavedJob>> {
        let tables = self.tables.read().await;
        let mut items: Vec<SavedJob> = tables
            .saved_jobs
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[async_trait]
impl SessionRepository for MemoryRepository {
    async fn create(&self, session: NewSession) -> Result<Session> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&session.user_id) {
            return Err(Error::NotFound("User not found".to_string()));
        }
        if tables.sessions.contains_key(&session.id) {
            return Err(Error::Conflict("Resource already exists".to_string()));
        }
        let created = Session {
            id: session.id,
            user_id: session.user_id,
            refresh_token_hash: session.refresh_token_hash,
            expires_at: session.expires_at,
            created_at: Utc::now(),
        };
        tables.sessions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let removed = self.tables.write().await.sessions.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}
