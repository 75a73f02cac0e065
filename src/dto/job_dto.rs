use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::job::{
    ExperienceLevel, Job, JobChanges, JobFilter, JobListing, JobStatus, JobType, LocationType,
    NewJob,
};
use crate::utils::format::format_salary_range;
use crate::utils::validation::{clean_list, validate_salary_range};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Absent stays `None`; an explicit `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_currency() -> String {
    "USD".to_string()
}

fn create_salary_range(payload: &CreateJobPayload) -> Result<(), ValidationError> {
    validate_salary_range(payload.salary_min, payload.salary_max)
}

fn update_salary_range(payload: &UpdateJobPayload) -> Result<(), ValidationError> {
    validate_salary_range(payload.salary_min.flatten(), payload.salary_max.flatten())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "create_salary_range"))]
pub struct CreateJobPayload {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 10, max = 20000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub requirements: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub skills: Vec<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub location_type: LocationType,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub status: Option<JobStatus>,
}

impl CreateJobPayload {
    pub fn into_new_job(self, company_id: Uuid) -> NewJob {
        NewJob {
            company_id,
            title: self.title.trim().to_string(),
            description: self.description,
            requirements: clean_list(self.requirements),
            responsibilities: clean_list(self.responsibilities),
            skills: clean_list(self.skills),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            currency: self.currency.to_ascii_uppercase(),
            location: self.location.trim().to_string(),
            location_type: self.location_type,
            job_type: self.job_type,
            experience_level: self.experience_level,
            status: self.status.unwrap_or(JobStatus::Draft),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "update_salary_range"))]
pub struct UpdateJobPayload {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 20000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub requirements: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub responsibilities: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub skills: Option<Vec<String>>,
    /// `null` clears the stored value.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub salary_min: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub salary_max: Option<Option<Decimal>>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    pub location_type: Option<LocationType>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub status: Option<JobStatus>,
}

impl From<UpdateJobPayload> for JobChanges {
    fn from(value: UpdateJobPayload) -> Self {
        Self {
            title: value.title.map(|t| t.trim().to_string()),
            description: value.description,
            requirements: value.requirements.map(clean_list),
            responsibilities: value.responsibilities.map(clean_list),
            skills: value.skills.map(clean_list),
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            currency: value.currency.map(|c| c.to_ascii_uppercase()),
            location: value.location.map(|l| l.trim().to_string()),
            location_type: value.location_type,
            job_type: value.job_type,
            experience_level: value.experience_level,
            status: value.status,
        }
    }
}

/// Query string of `GET /api/jobs`. Array filters accept both `key[]=` and
/// repeated `key=` forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearchParams {
    pub q: Option<String>,
    pub location: Option<String>,
    #[serde(default, rename = "locationType[]", alias = "locationType")]
    pub location_type: Vec<LocationType>,
    #[serde(default, rename = "experienceLevel[]", alias = "experienceLevel")]
    pub experience_level: Vec<ExperienceLevel>,
    #[serde(default, rename = "jobType[]", alias = "jobType")]
    pub job_type: Vec<JobType>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl JobSearchParams {
    /// Capped so that `(page - 1) * limit` cannot overflow.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, i64::MAX / MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Public search only ever sees open postings.
    pub fn into_filter(self) -> JobFilter {
        let page = self.page();
        let limit = self.limit();
        JobFilter {
            query: non_blank(self.q),
            location: non_blank(self.location),
            location_types: self.location_type,
            experience_levels: self.experience_level,
            job_types: self.job_type,
            status: Some(JobStatus::Open),
            company_id: None,
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub skills: Vec<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub currency: String,
    pub salary_text: Option<String>,
    pub location: String,
    pub location_type: LocationType,
    pub location_type_label: String,
    pub job_type: JobType,
    pub job_type_label: String,
    pub experience_level: ExperienceLevel,
    pub experience_level_label: String,
    pub status: JobStatus,
    pub status_label: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        let salary_text = format_salary_range(value.salary_min, value.salary_max, &value.currency);
        Self {
            id: value.id,
            company_id: value.company_id,
            title: value.title,
            description: value.description,
            requirements: value.requirements,
            responsibilities: value.responsibilities,
            skills: value.skills,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            currency: value.currency,
            salary_text,
            location: value.location,
            location_type: value.location_type,
            location_type_label: value.location_type.label().to_string(),
            job_type: value.job_type,
            job_type_label: value.job_type.label().to_string(),
            experience_level: value.experience_level,
            experience_level_label: value.experience_level.label().to_string(),
            status: value.status,
            status_label: value.status.label().to_string(),
            views: value.views,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobListingResponse {
    #[serde(flatten)]
    pub job: JobResponse,
    pub company: CompanySummary,
    pub application_count: i64,
}

impl From<JobListing> for JobListingResponse {
    fn from(value: JobListing) -> Self {
        let company = CompanySummary {
            id: value.job.company_id,
            name: value.company_name,
            logo_url: value.company_logo_url,
            location: value.company_location,
        };
        Self {
            job: value.job.into(),
            company,
            application_count: value.application_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub listing: JobListingResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_applied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_saved: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub jobs: Vec<JobListingResponse>,
    pub pagination: Pagination,
}
