use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{JobRepository, SavedJobRepository};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::job::JobListing;
use crate::models::saved_job::SavedJob;
use crate::services::job_service::job_not_found;

#[derive(Clone)]
pub struct SavedJobService {
    saved_jobs: Arc<dyn SavedJobRepository>,
    jobs: Arc<dyn JobRepository>,
}

impl SavedJobService {
    pub fn new(saved_jobs: Arc<dyn SavedJobRepository>, jobs: Arc<dyn JobRepository>) -> Self {
        Self { saved_jobs, jobs }
    }

    /// Bookmark a job. The job must exist and must not already be saved by
    /// the caller.
    pub async fn save(&self, auth: &AuthUser, job_id: Uuid) -> Result<SavedJob> {
        if self.jobs.find_by_id(job_id).await?.is_none() {
            return Err(job_not_found());
        }
        if self.saved_jobs.find(auth.user_id, job_id).await?.is_some() {
            return Err(Error::Conflict("Job already saved".to_string()));
        }

        let saved = self.saved_jobs.create(auth.user_id, job_id).await?;
        tracing::debug!(user_id = %auth.user_id, job_id = %job_id, "job saved");
        Ok(saved)
    }

    /// Remove a bookmark. Removing one that does not exist is not an error.
    pub async fn unsave(&self, auth: &AuthUser, job_id: Uuid) -> Result<()> {
        let removed = self.saved_jobs.delete(auth.user_id, job_id).await?;
        tracing::debug!(user_id = %auth.user_id, job_id = %job_id, removed, "job unsaved");
        Ok(())
    }

    pub async fn list_mine(&self, auth: &AuthUser) -> Result<Vec<(SavedJob, Option<JobListing>)>> {
        let saved = self.saved_jobs.list_for_user(auth.user_id).await?;
        let ids = saved.iter().map(|s| s.job_id).collect::<Vec<_>>();
        let mut listings = self
            .jobs
            .listings_by_ids(ids)
            .await?
            .into_iter()
            .map(|l| (l.job.id, l))
            .collect::<HashMap<_, _>>();

        Ok(saved
            .into_iter()
            .map(|s| {
                let listing = listings.remove(&s.job_id);
                (s, listing)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::{MockJobRepository, MockSavedJobRepository};
    use crate::models::user::Role;

    fn caller() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn saving_a_missing_job_writes_nothing() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|_| Ok(None));
        let mut saved = MockSavedJobRepository::new();
        saved.expect_create().never();
        let service = SavedJobService::new(Arc::new(saved), Arc::new(jobs));

        let err = service.save(&caller(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn unsave_is_idempotent() {
        let mut saved = MockSavedJobRepository::new();
        saved.expect_delete().times(2).returning(|_, _| Ok(0));
        let service = SavedJobService::new(Arc::new(saved), Arc::new(MockJobRepository::new()));

        let auth = caller();
        let job_id = Uuid::new_v4();
        assert!(service.unsave(&auth, job_id).await.is_ok());
        assert!(service.unsave(&auth, job_id).await.is_ok());
    }
}
