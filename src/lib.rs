pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::repository::Repositories;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    company_service::CompanyService, job_service::JobService, profile_service::ProfileService,
    saved_job_service::SavedJobService,
};
use crate::utils::token::TokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenIssuer,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub saved_job_service: SavedJobService,
    pub profile_service: ProfileService,
    pub company_service: CompanyService,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        let tokens = TokenIssuer::from_config(&config);

        let auth_service =
            AuthService::new(repos.users.clone(), repos.sessions.clone(), tokens.clone());
        let job_service = JobService::new(
            repos.jobs.clone(),
            repos.companies.clone(),
            repos.applications.clone(),
            repos.saved_jobs.clone(),
        );
        let application_service = ApplicationService::new(
            repos.applications.clone(),
            repos.jobs.clone(),
            repos.companies.clone(),
            repos.users.clone(),
        );
        let saved_job_service = SavedJobService::new(repos.saved_jobs.clone(), repos.jobs.clone());
        let profile_service = ProfileService::new(repos.users.clone());
        let company_service = CompanyService::new(repos.companies, repos.jobs);

        Self {
            config: Arc::new(config),
            tokens,
            auth_service,
            job_service,
            application_service,
            saved_job_service,
            profile_service,
            company_service,
        }
    }
}
