use std::sync::Arc;

use crate::database::repository::UserRepository;
use crate::dto::profile_dto::UpdateProfilePayload;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::user::User;

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get(&self, auth: &AuthUser) -> Result<User> {
        self.users
            .find_by_id(auth.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn update(&self, auth: &AuthUser, payload: UpdateProfilePayload) -> Result<User> {
        let user = self.users.update_profile(auth.user_id, payload.into()).await?;
        tracing::debug!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}
