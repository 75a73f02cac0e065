use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, CompanyRepository, JobRepository, SavedJobRepository,
};
use crate::dto::job_dto::{CreateJobPayload, JobSearchParams, Pagination, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::company::Company;
use crate::models::job::{Job, JobChanges, JobFilter, JobListing, JobStatus};
use crate::models::user::Role;
use crate::utils::validation::validate_salary_range;

const COMPANY_JOBS_LIMIT: i64 = 500;

/// Viewer-specific flags attached to a job detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewerState {
    pub has_applied: bool,
    pub has_saved: bool,
}

pub struct JobDetail {
    pub listing: JobListing,
    pub viewer: Option<ViewerState>,
}

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    companies: Arc<dyn CompanyRepository>,
    applications: Arc<dyn ApplicationRepository>,
    saved_jobs: Arc<dyn SavedJobRepository>,
}

pub(crate) fn job_not_found() -> Error {
    Error::NotFound("Job not found".to_string())
}

/// Resolves the caller's company and checks it owns `job`.
pub(crate) async fn ensure_job_owner(
    companies: &dyn CompanyRepository,
    auth: &AuthUser,
    job: &Job,
) -> Result<Company> {
    auth.require_role(Role::Company)?;
    let company = companies
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::Forbidden("You do not own this job".to_string()))?;
    if company.id != job.company_id {
        return Err(Error::Forbidden("You do not own this job".to_string()));
    }
    Ok(company)
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        companies: Arc<dyn CompanyRepository>,
        applications: Arc<dyn ApplicationRepository>,
        saved_jobs: Arc<dyn SavedJobRepository>,
    ) -> Self {
        Self {
            jobs,
            companies,
            applications,
            saved_jobs,
        }
    }

    pub async fn search(&self, params: JobSearchParams) -> Result<(Vec<JobListing>, Pagination)> {
        let page = params.page();
        let limit = params.limit();
        let (items, total) = self.jobs.search(params.into_filter()).await?;
        Ok((items, Pagination::new(page, limit, total)))
    }

    /// Loads a job for display and counts the view. Jobs that are not open are
    /// only visible to the company that owns them.
    pub async fn view(&self, id: Uuid, viewer: Option<&AuthUser>) -> Result<JobDetail> {
        let mut listing = self.jobs.find_listing(id).await?.ok_or_else(job_not_found)?;

        if listing.job.status != JobStatus::Open {
            let is_owner = match viewer {
                Some(auth) => ensure_job_owner(self.companies.as_ref(), auth, &listing.job)
                    .await
                    .is_ok(),
                None => false,
            };
            if !is_owner {
                return Err(job_not_found());
            }
        }

        listing.job.views = self.jobs.increment_views(id).await?;

        let viewer = match viewer {
            Some(auth) => Some(ViewerState {
                has_applied: self
                    .applications
                    .find_for_user_and_job(auth.user_id, id)
                    .await?
                    .is_some(),
                has_saved: self.saved_jobs.find(auth.user_id, id).await?.is_some(),
            }),
            None => None,
        };

        Ok(JobDetail { listing, viewer })
    }

    pub async fn create(&self, auth: &AuthUser, payload: CreateJobPayload) -> Result<Job> {
        auth.require_role(Role::Company)?;
        let company = self
            .companies
            .find_by_user(auth.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Company profile not found".to_string()))?;

        let job = self.jobs.create(payload.into_new_job(company.id)).await?;
        tracing::info!(job_id = %job.id, company_id = %company.id, status = ?job.status, "job created");
        Ok(job)
    }

    pub async fn update(&self, auth: &AuthUser, id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let job = self.jobs.find_by_id(id).await?.ok_or_else(job_not_found)?;
        ensure_job_owner(self.companies.as_ref(), auth, &job).await?;

        let changes = JobChanges::from(payload);
        let mut merged = job.clone();
        changes.apply(&mut merged);
        validate_salary_range(merged.salary_min, merged.salary_max).map_err(|e| {
            let message = match e.code.as_ref() {
                "salary_range" => "salaryMin must not exceed salaryMax",
                "salary_too_large" => "Salary is too large",
                _ => "Salary must not be negative",
            };
            Error::BadRequest(message.to_string())
        })?;

        let updated = self.jobs.update(id, changes).await?;
        if updated.status != job.status {
            tracing::info!(job_id = %id, from = ?job.status, to = ?updated.status, "job status changed");
        }
        Ok(updated)
    }

    pub async fn delete(&self, auth: &AuthUser, id: Uuid) -> Result<()> {
        let job = self.jobs.find_by_id(id).await?.ok_or_else(job_not_found)?;
        ensure_job_owner(self.companies.as_ref(), auth, &job).await?;
        self.jobs.delete(id).await?;
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }

    /// All of the caller company's jobs, whatever their status.
    pub async fn list_for_company(&self, auth: &AuthUser) -> Result<Vec<JobListing>> {
        auth.require_role(Role::Company)?;
        let company = self
            .companies
            .find_by_user(auth.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Company profile not found".to_string()))?;
        let filter = JobFilter {
            company_id: Some(company.id),
            limit: COMPANY_JOBS_LIMIT,
            ..JobFilter::default()
        };
        let (items, _) = self.jobs.search(filter).await?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::{
        MockApplicationRepository, MockCompanyRepository, MockJobRepository,
        MockSavedJobRepository,
    };

    #[tokio::test]
    async fn storage_failure_while_searching_is_an_internal_error() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_search()
            .returning(|_| Err(Error::Internal("connection reset".into())));
        let service = JobService::new(
            Arc::new(jobs),
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockApplicationRepository::new()),
            Arc::new(MockSavedJobRepository::new()),
        );

        let err = service.search(JobSearchParams::default()).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn job_seekers_cannot_create_jobs() {
        let service = JobService::new(
            Arc::new(MockJobRepository::new()),
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockApplicationRepository::new()),
            Arc::new(MockSavedJobRepository::new()),
        );
        let auth = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::User,
        };
        let payload: CreateJobPayload = serde_json::from_value(serde_json::json!({
            "title": "Rust engineer",
            "description": "Write services in Rust",
            "location": "Remote",
            "locationType": "REMOTE",
            "jobType": "FULL_TIME",
            "experienceLevel": "SENIOR"
        }))
        .unwrap();
        let err = service.create(&auth, payload).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }
}
