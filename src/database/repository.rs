//! Persistence ports. Each trait is implemented by the PostgreSQL adapter in
//! [`super::postgres`] and by the in-memory adapter in [`super::memory`].
//!
//! Adapters report a violated `(user_id, job_id)` uniqueness constraint as
//! [`Error::Conflict`](crate::error::Error::Conflict), so a lost insert race
//! surfaces the same way as the explicit existence checks in the services.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    application::{ApplicantView, Application, ApplicationStatus, NewApplication},
    company::{Company, CompanyChanges},
    job::{Job, JobChanges, JobFilter, JobListing, NewJob},
    saved_job::SavedJob,
    session::{NewSession, Session},
    user::{NewUser, ProfileChanges, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, plus its company row when `company_name` is given.
    async fn create(
        &self,
        user: NewUser,
        company_name: Option<String>,
    ) -> Result<(User, Option<Company>)>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Lookup by lowercase email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Company>>;

    async fn update(&self, id: Uuid, changes: CompanyChanges) -> Result<Company>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: NewJob) -> Result<Job>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>>;

    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>>;

    /// Atomically bump the view counter and return the new value.
    async fn increment_views(&self, id: Uuid) -> Result<i64>;

    /// Returns one page of matches and the total match count.
    async fn search(&self, filter: JobFilter) -> Result<(Vec<JobListing>, i64)>;

    async fn listings_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<JobListing>>;

    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Job>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create(&self, application: NewApplication) -> Result<Application>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>>;

    async fn find_for_user_and_job(&self, user_id: Uuid, job_id: Uuid)
        -> Result<Option<Application>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>>;

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicantView>>;

    async fn update_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Application>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedJobRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob>;

    async fn find(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<SavedJob>>;

    /// Returns the number of rows removed.
    async fn delete(&self, user_id: Uuid, job_id: Uuid) -> Result<u64>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SavedJob>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: NewSession) -> Result<Session>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>>;

    async fn delete(&self, id: Uuid) -> Result<u64>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// The full set of repositories the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub saved_jobs: Arc<dyn SavedJobRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Repositories {
    /// Wire every port to one adapter value.
    pub fn from_adapter<A>(adapter: A) -> Self
    where
        A: UserRepository
            + CompanyRepository
            + JobRepository
            + ApplicationRepository
            + SavedJobRepository
            + SessionRepository
            + 'static,
    {
        let shared = Arc::new(adapter);
        Self {
            users: shared.clone(),
            companies: shared.clone(),
            jobs: shared.clone(),
            applications: shared.clone(),
            saved_jobs: shared.clone(),
            sessions: shared,
        }
    }
}
