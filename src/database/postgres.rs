use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, CompanyRepository, JobRepository, SavedJobRepository,
    SessionRepository, UserRepository,
};
use crate::error::{Error, Result};
use crate::models::{
    application::{ApplicantView, Application, ApplicationStatus, NewApplication},
    company::{Company, CompanyChanges},
    job::{Job, JobChanges, JobFilter, JobListing, NewJob},
    saved_job::SavedJob,
    session::{NewSession, Session},
    user::{NewUser, ProfileChanges, User},
};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, headline, bio, location, skills, portfolio_url, resume_url, created_at, updated_at";

const COMPANY_COLUMNS: &str =
    "id, user_id, name, description, website, logo_url, location, industry, size, created_at, updated_at";

const JOB_COLUMNS: &str = "id, company_id, title, description, requirements, responsibilities, skills, salary_min, salary_max, currency, location, location_type, job_type, experience_level, status, views, created_at, updated_at";

const LISTING_SELECT: &str = "SELECT j.id, j.company_id, j.title, j.description, j.requirements, j.responsibilities, j.skills, j.salary_min, j.salary_max, j.currency, j.location, j.location_type, j.job_type, j.experience_level, j.status, j.views, j.created_at, j.updated_at,
        c.name AS company_name, c.logo_url AS company_logo_url, c.location AS company_location,
        (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
     FROM jobs j
     JOIN companies c ON c.id = j.company_id";

const APPLICATION_COLUMNS: &str =
    "id, user_id, job_id, status, cover_letter, resume_url, created_at, updated_at";

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Wraps `value` for a literal substring match under `ILIKE ... ESCAPE '\'`.
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        builder.push(" AND j.status = ").push_bind(status);
    }
    if let Some(company_id) = filter.company_id {
        builder.push(" AND j.company_id = ").push_bind(company_id);
    }
    if let Some(q) = &filter.query {
        let pattern = like_pattern(q);
        builder
            .push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR j.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR c.name ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(location) = &filter.location {
        builder
            .push(" AND j.location ILIKE ")
            .push_bind(like_pattern(location))
            .push(" ESCAPE '\\'");
    }
    if !filter.location_types.is_empty() {
        let values: Vec<String> = filter
            .location_types
            .iter()
            .map(|v| v.as_str().to_string())
            .collect();
        builder
            .push(" AND j.location_type::text = ANY(")
            .push_bind(values)
            .push(")");
    }
    if !filter.experience_levels.is_empty() {
        let values: Vec<String> = filter
            .experience_levels
            .iter()
            .map(|v| v.as_str().to_string())
            .collect();
        builder
            .push(" AND j.experience_level::text = ANY(")
            .push_bind(values)
            .push(")");
    }
    if !filter.job_types.is_empty() {
        let values: Vec<String> = filter.job_types.iter().map(|v| v.as_str().to_string()).collect();
        builder
            .push(" AND j.job_type::text = ANY(")
            .push_bind(values)
            .push(")");
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create(
        &self,
        user: NewUser,
        company_name: Option<String>,
    ) -> Result<(User, Option<Company>)> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await?;

        let company = match company_name {
            Some(name) => Some(
                sqlx::query_as::<_, Company>(&format!(
                    "INSERT INTO companies (user_id, name) VALUES ($1, $2) RETURNING {}",
                    COMPANY_COLUMNS
                ))
                .bind(created.id)
                .bind(name)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;
        Ok((created, company))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET
                name = COALESCE($2, name),
                headline = COALESCE($3, headline),
                bio = COALESCE($4, bio),
                location = COALESCE($5, location),
                skills = COALESCE($6, skills),
                portfolio_url = COALESCE($7, portfolio_url),
                resume_url = COALESCE($8, resume_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.headline)
        .bind(changes.bio)
        .bind(changes.location)
        .bind(changes.skills)
        .bind(changes.portfolio_url)
        .bind(changes.resume_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl CompanyRepository for PgRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE user_id = $1",
            COMPANY_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn update(&self, id: Uuid, changes: CompanyChanges) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "UPDATE companies
             SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                website = COALESCE($4, website),
                logo_url = COALESCE($5, logo_url),
                location = COALESCE($6, location),
                industry = COALESCE($7, industry),
                size = COALESCE($8, size),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.website)
        .bind(changes.logo_url)
        .bind(changes.location)
        .bind(changes.industry)
        .bind(changes.size)
        .fetch_one(&self.pool)
        .await?;
        Ok(company)
    }
}

#[async_trait]
impl JobRepository for PgRepository {
    async fn create(&self, job: NewJob) -> Result<Job> {
        let created = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (
                company_id, title, description, requirements, responsibilities, skills,
                salary_min, salary_max, currency, location, location_type, job_type,
                experience_level, status
             ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11, $12,
                $13, $14
             )
             RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(job.company_id)
        .bind(job.title)
        .bind(job.description)
        .bind(job.requirements)
        .bind(job.responsibilities)
        .bind(job.skills)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.currency)
        .bind(job.location)
        .bind(job.location_type)
        .bind(job.job_type)
        .bind(job.experience_level)
        .bind(job.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>> {
        let listing = sqlx::query_as::<_, JobListing>(&format!("{} WHERE j.id = $1", LISTING_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn increment_views(&self, id: Uuid) -> Result<i64> {
        let views = sqlx::query_scalar::<_, i64>(
            "UPDATE jobs SET views = views + 1 WHERE id = $1 RETURNING views",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(views)
    }

    async fn search(&self, filter: JobFilter) -> Result<(Vec<JobListing>, i64)> {
        let mut items_query = QueryBuilder::<Postgres>::new(LISTING_SELECT);
        push_filters(&mut items_query, &filter);
        items_query
            .push(" ORDER BY j.created_at DESC, j.id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);
        let items = items_query
            .build_query_as::<JobListing>()
            .fetch_all(&self.pool)
            .await?;

        let mut total_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM jobs j JOIN companies c ON c.id = j.company_id",
        );
        push_filters(&mut total_query, &filter);
        let total = total_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn listings_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<JobListing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, JobListing>(&format!("{} WHERE j.id = ANY($1)", LISTING_SELECT))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs
             SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                requirements = COALESCE($4, requirements),
                responsibilities = COALESCE($5, responsibilities),
                skills = COALESCE($6, skills),
                salary_min = CASE WHEN $7 THEN $8 ELSE salary_min END,
                salary_max = CASE WHEN $9 THEN $10 ELSE salary_max END,
                currency = COALESCE($11, currency),
                location = COALESCE($12, location),
                location_type = COALESCE($13, location_type),
                job_type = COALESCE($14, job_type),
                experience_level = COALESCE($15, experience_level),
                status = COALESCE($16, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.requirements)
        .bind(changes.responsibilities)
        .bind(changes.skills)
        .bind(changes.salary_min.is_some())
        .bind(changes.salary_min.flatten())
        .bind(changes.salary_max.is_some())
        .bind(changes.salary_max.flatten())
        .bind(changes.currency)
        .bind(changes.location)
        .bind(changes.location_type)
        .bind(changes.job_type)
        .bind(changes.experience_level)
        .bind(changes.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationRepository for PgRepository {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let created = sqlx::query_as::<_, Application>(&format!(
            "INSERT INTO applications (user_id, job_id, cover_letter, resume_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(application.user_id)
        .bind(application.job_id)
        .bind(application.cover_letter)
        .bind(application.resume_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("Already applied to this job".to_string()),
            other => other,
        })?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn find_for_user_and_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE user_id = $1 AND job_id = $2",
            APPLICATION_COLUMNS
        ))
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let items = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicantView>> {
        let items = sqlx::query_as::<_, ApplicantView>(
            "SELECT a.id, a.user_id, a.job_id, a.status, a.cover_letter, a.resume_url, a.created_at, a.updated_at,
                    u.name AS applicant_name, u.email AS applicant_email, u.headline AS applicant_headline,
                    u.skills AS applicant_skills, u.portfolio_url AS applicant_portfolio_url
             FROM applications a
             JOIN users u ON u.id = a.user_id
             WHERE a.job_id = $1
             ORDER BY a.created_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn update_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Application> {
        let application = sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }
}

#[async_trait]
impl SavedJobRepository for PgRepository {
    async fn create(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob> {
        let saved = sqlx::query_as::<_, SavedJob>(
            "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2)
             RETURNING id, user_id, job_id, created_at",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("Job already saved".to_string()),
            other => other,
        })?;
        Ok(saved)
    }

    async fn find(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<SavedJob>> {
        let saved = sqlx::query_as::<_, SavedJob>(
            "SELECT id, user_id, job_id, created_at FROM saved_jobs WHERE user_id = $1 AND job_id = $2",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete(&self, user_id: Uuid, job_id: Uuid) -> Result<u64> {
        let res = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SavedJob>> {
        let items = sqlx::query_as::<_, SavedJob>(
            "SELECT id, user_id, job_id, created_at FROM saved_jobs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}

#[async_trait]
impl SessionRepository for PgRepository {
    async fn create(&self, session: NewSession) -> Result<Session> {
        let created = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, refresh_token_hash, expires_at, created_at",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.refresh_token_hash)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, refresh_token_hash, expires_at, created_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
