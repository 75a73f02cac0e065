use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
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

#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
}

impl CompanyChanges {
    pub fn apply(&self, company: &mut Company) {
        if let Some(name) = &self.name {
            company.name = name.clone();
        }
        if let Some(v) = &self.description {
            company.description = Some(v.clone());
        }
        if let Some(v) = &self.website {
            company.website = Some(v.clone());
        }
        if let Some(v) = &self.logo_url {
            company.logo_url = Some(v.clone());
        }
        if let Some(v) = &self.location {
            company.location = Some(v.clone());
        }
        if let Some(v) = &self.industry {
            company.industry = Some(v.clone());
        }
        if let Some(v) = &self.size {
            company.size = Some(v.clone());
        }
    }
}
