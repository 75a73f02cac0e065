use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::job_dto::JobListingResponse;
use crate::models::company::{Company, CompanyChanges};
use crate::models::user::ProfileChanges;
use crate::utils::validation::clean_list;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub headline: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub skills: Option<Vec<String>>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

impl From<UpdateProfilePayload> for ProfileChanges {
    fn from(value: UpdateProfilePayload) -> Self {
        Self {
            name: value.name,
            headline: value.headline,
            bio: value.bio,
            location: value.location,
            skills: value.skills.map(clean_list),
            portfolio_url: value.portfolio_url,
            resume_url: value.resume_url,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    #[validate(length(max = 50))]
    pub size: Option<String>,
}

impl From<UpdateCompanyPayload> for CompanyChanges {
    fn from(value: UpdateCompanyPayload) -> Self {
        Self {
            name: value.name,
            description: value.description,
            website: value.website,
            logo_url: value.logo_url,
            location: value.location,
            industry: value.industry,
            size: value.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(value: Company) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            description: value.description,
            website: value.website,
            logo_url: value.logo_url,
            location: value.location,
            industry: value.industry,
            size: value.size,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyPageResponse {
    pub company: CompanyResponse,
    pub jobs: Vec<JobListingResponse>,
}
