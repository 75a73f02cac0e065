use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{CompanyRepository, JobRepository};
use crate::dto::profile_dto::UpdateCompanyPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::company::Company;
use crate::models::job::{JobFilter, JobListing, JobStatus};
use crate::models::user::Role;

const PUBLIC_JOBS_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct CompanyService {
    companies: Arc<dyn CompanyRepository>,
    jobs: Arc<dyn JobRepository>,
}

fn company_not_found() -> Error {
    Error::NotFound("Company not found".to_string())
}

impl CompanyService {
    pub fn new(companies: Arc<dyn CompanyRepository>, jobs: Arc<dyn JobRepository>) -> Self {
        Self { companies, jobs }
    }

    pub async fn get_mine(&self, auth: &AuthUser) -> Result<Company> {
        auth.require_role(Role::Company)?;
        self.companies
            .find_by_user(auth.user_id)
            .await?
            .ok_or_else(company_not_found)
    }

    pub async fn update_mine(&self, auth: &AuthUser, payload: UpdateCompanyPayload) -> Result<Company> {
        let company = self.get_mine(auth).await?;
        let updated = self.companies.update(company.id, payload.into()).await?;
        tracing::debug!(company_id = %updated.id, "company profile updated");
        Ok(updated)
    }

    /// Public company page: the profile plus its open jobs.
    pub async fn public_page(&self, id: Uuid) -> Result<(Company, Vec<JobListing>)> {
        let company = self
            .companies
            .find_by_id(id)
            .await?
            .ok_or_else(company_not_found)?;
        let filter = JobFilter {
            status: Some(JobStatus::Open),
            company_id: Some(company.id),
            limit: PUBLIC_JOBS_LIMIT,
            ..JobFilter::default()
        };
        let (jobs, _) = self.jobs.search(filter).await?;
        Ok((company, jobs))
    }
}
