use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, CompanyRepository, JobRepository, UserRepository,
};
use crate::dto::application_dto::ApplyPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::application::{ApplicantView, Application, ApplicationStatus, NewApplication};
use crate::models::job::{JobListing, JobStatus};
use crate::models::user::Role;
use crate::services::job_service::{ensure_job_owner, job_not_found};

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    companies: Arc<dyn CompanyRepository>,
    users: Arc<dyn UserRepository>,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        companies: Arc<dyn CompanyRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            applications,
            jobs,
            companies,
            users,
        }
    }

    /// Submit an application for an open job. Job seekers only, once per job.
    pub async fn apply(&self, auth: &AuthUser, job_id: Uuid, payload: ApplyPayload) -> Result<Application> {
        auth.require_role(Role::User)?;

        let job = self.jobs.find_by_id(job_id).await?.ok_or_else(job_not_found)?;
        if job.status != JobStatus::Open {
            return Err(Error::BadRequest(
                "Job is not accepting applications".to_string(),
            ));
        }

        if self
            .applications
            .find_for_user_and_job(auth.user_id, job_id)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("Already applied to this job".to_string()));
        }

        let resume_url = match payload.resume_url.filter(|u| !u.trim().is_empty()) {
            Some(url) => Some(url),
            None => self
                .users
                .find_by_id(auth.user_id)
                .await?
                .and_then(|user| user.resume_url),
        };

        let application = self
            .applications
            .create(NewApplication {
                user_id: auth.user_id,
                job_id,
                cover_letter: payload.cover_letter.filter(|c| !c.trim().is_empty()),
                resume_url,
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            job_id = %job_id,
            user_id = %auth.user_id,
            "application submitted"
        );
        Ok(application)
    }

    /// The caller's applications, newest first, each paired with its job if it
    /// still exists.
    pub async fn list_mine(&self, auth: &AuthUser) -> Result<Vec<(Application, Option<JobListing>)>> {
        let applications = self.applications.list_for_user(auth.user_id).await?;
        let ids = applications.iter().map(|a| a.job_id).collect::<Vec<_>>();
        let mut listings = self
            .jobs
            .listings_by_ids(ids)
            .await?
            .into_iter()
            .map(|l| (l.job.id, l))
            .collect::<HashMap<_, _>>();

        // one application per job, so each listing is taken at most once
        Ok(applications
            .into_iter()
            .map(|a| {
                let listing = listings.remove(&a.job_id);
                (a, listing)
            })
            .collect())
    }

    pub async fn list_for_job(&self, auth: &AuthUser, job_id: Uuid) -> Result<Vec<ApplicantView>> {
        let job = self.jobs.find_by_id(job_id).await?.ok_or_else(job_not_found)?;
        ensure_job_owner(self.companies.as_ref(), auth, &job).await?;
        self.applications.list_for_job(job_id).await
    }

    /// Move an application to a new review status. Only the company owning the
    /// job may do this.
    pub async fn update_status(
        &self,
        auth: &AuthUser,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        let job = self
            .jobs
            .find_by_id(application.job_id)
            .await?
            .ok_or_else(job_not_found)?;
        ensure_job_owner(self.companies.as_ref(), auth, &job).await?;

        let updated = self.applications.update_status(application_id, status).await?;
        tracing::info!(
            application_id = %application_id,
            from = ?application.status,
            to = ?updated.status,
            "application status changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::{
        MockApplicationRepository, MockCompanyRepository, MockJobRepository, MockUserRepository,
    };

    #[tokio::test]
    async fn companies_cannot_apply() {
        let service = ApplicationService::new(
            Arc::new(MockApplicationRepository::new()),
            Arc::new(MockJobRepository::new()),
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockUserRepository::new()),
        );
        let auth = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Company,
        };
        let err = service
            .apply(&auth, Uuid::new_v4(), ApplyPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn applying_to_a_missing_job_is_not_found() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|_| Ok(None));
        let mut applications = MockApplicationRepository::new();
        applications.expect_create().never();
        let service = ApplicationService::new(
            Arc::new(applications),
            Arc::new(jobs),
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockUserRepository::new()),
        );
        let auth = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::User,
        };
        let err = service
            .apply(&auth, Uuid::new_v4(), ApplyPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
