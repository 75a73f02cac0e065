use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Draft,
    Open,
    Closed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "location_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Onsite,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "experience_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "DRAFT",
            JobStatus::Open => "OPEN",
            JobStatus::Closed => "CLOSED",
            JobStatus::Paused => "PAUSED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Draft => "Draft",
            JobStatus::Open => "Open",
            JobStatus::Closed => "Closed",
            JobStatus::Paused => "Paused",
        }
    }
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Onsite => "ONSITE",
            LocationType::Remote => "REMOTE",
            LocationType::Hybrid => "HYBRID",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LocationType::Onsite => "On-site",
            LocationType::Remote => "Remote",
            LocationType::Hybrid => "Hybrid",
        }
    }
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACT",
            JobType::Internship => "INTERNSHIP",
            JobType::Freelance => "FREELANCE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
            JobType::Freelance => "Freelance",
        }
    }
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "ENTRY",
            ExperienceLevel::Junior => "JUNIOR",
            ExperienceLevel::Mid => "MID",
            ExperienceLevel::Senior => "SENIOR",
            ExperienceLevel::Lead => "LEAD",
            ExperienceLevel::Executive => "EXECUTIVE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry level",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
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
    pub location: String,
    pub location_type: LocationType,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub status: JobStatus,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job joined with the company fields and application count shown in listings.
#[derive(Debug, Clone, FromRow)]
pub struct JobListing {
    #[sqlx(flatten)]
    pub job: Job,
    pub company_name: String,
    pub company_logo_url: Option<String>,
    pub company_location: Option<String>,
    pub application_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub skills: Vec<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub currency: String,
    pub location: String,
    pub location_type: LocationType,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    /// `Some(None)` clears the salary bound.
    pub salary_min: Option<Option<Decimal>>,
    pub salary_max: Option<Option<Decimal>>,
    pub currency: Option<String>,
    pub location: Option<String>,
    pub location_type: Option<LocationType>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub status: Option<JobStatus>,
}

impl JobChanges {
    pub fn apply(&self, job: &mut Job) {
        if let Some(v) = &self.title {
            job.title = v.clone();
        }
        if let Some(v) = &self.description {
            job.description = v.clone();
        }
        if let Some(v) = &self.requirements {
            job.requirements = v.clone();
        }
        if let Some(v) = &self.responsibilities {
            job.responsibilities = v.clone();
        }
        if let Some(v) = &self.skills {
            job.skills = v.clone();
        }
        if let Some(v) = self.salary_min {
            job.salary_min = v;
        }
        if let Some(v) = self.salary_max {
            job.salary_max = v;
        }
        if let Some(v) = &self.currency {
            job.currency = v.clone();
        }
        if let Some(v) = &self.location {
            job.location = v.clone();
        }
        if let Some(v) = self.location_type {
            job.location_type = v;
        }
        if let Some(v) = self.job_type {
            job.job_type = v;
        }
        if let Some(v) = self.experience_level {
            job.experience_level = v;
        }
        if let Some(v) = self.status {
            job.status = v;
        }
    }
}

/// Search criteria for job listings. Empty vectors mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub query: Option<String>,
    pub location: Option<String>,
    pub location_types: Vec<LocationType>,
    pub experience_levels: Vec<ExperienceLevel>,
    pub job_types: Vec<JobType>,
    pub status: Option<JobStatus>,
    pub company_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(JobType::FullTime.label(), "Full-time");
        assert_eq!(LocationType::Onsite.label(), "On-site");
        assert_eq!(ExperienceLevel::Mid.label(), "Mid level");
        assert_eq!(JobStatus::Paused.label(), "Paused");
    }

    #[test]
    fn wire_names_match_as_str() {
        for lt in [LocationType::Onsite, LocationType::Remote, LocationType::Hybrid] {
            let wire = serde_json::to_value(lt).unwrap();
            assert_eq!(wire, lt.as_str());
        }
        let wire = serde_json::to_value(JobType::PartTime).unwrap();
        assert_eq!(wire, "PART_TIME");
    }
}
