use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::job_dto::JobListingResponse;
use crate::models::application::{ApplicantView, Application, ApplicationStatus};
use crate::models::saved_job::SavedJob;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    #[validate(length(max = 10000))]
    pub cover_letter: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateApplicationStatusPayload {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub status_label: String,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            job_id: value.job_id,
            status: value.status,
            status_label: value.status.label().to_string(),
            cover_letter: value.cover_letter,
            resume_url: value.resume_url,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationCreatedResponse {
    pub application: ApplicationResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyApplicationResponse {
    #[serde(flatten)]
    pub application: ApplicationResponse,
    pub job: Option<JobListingResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub name: String,
    pub email: String,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicantResponse {
    #[serde(flatten)]
    pub application: ApplicationResponse,
    pub applicant: ApplicantSummary,
}

impl From<ApplicantView> for ApplicantResponse {
    fn from(value: ApplicantView) -> Self {
        Self {
            application: value.application.into(),
            applicant: ApplicantSummary {
                name: value.applicant_name,
                email: value.applicant_email,
                headline: value.applicant_headline,
                skills: value.applicant_skills,
                portfolio_url: value.applicant_portfolio_url,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<SavedJob> for SavedJobResponse {
    fn from(value: SavedJob) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            job_id: value.job_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobCreatedResponse {
    pub saved_job: SavedJobResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobWithJobResponse {
    #[serde(flatten)]
    pub saved_job: SavedJobResponse,
    pub job: Option<JobListingResponse>,
}
