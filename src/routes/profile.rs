use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        application_dto::{ApplicationResponse, MyApplicationResponse, SavedJobResponse, SavedJobWithJobResponse},
        auth_dto::UserResponse,
        job_dto::JobListingResponse,
        profile_dto::UpdateProfilePayload,
    },
    error::Result,
    middleware::auth::AuthUser,
    routes::extract::ApiJson,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profile",
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let user = state.profile_service.get(&auth).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/api/profile",
    tag = "profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.profile_service.update(&auth, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/profile/applications",
    tag = "applications",
    responses(
        (status = 200, description = "The caller's applications with their jobs", body = Vec<MyApplicationResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn my_applications(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let items = state.application_service.list_mine(&auth).await?;
    let body = items
        .into_iter()
        .map(|(application, listing)| MyApplicationResponse {
            application: ApplicationResponse::from(application),
            job: listing.map(JobListingResponse::from),
        })
        .collect::<Vec<_>>();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/profile/saved-jobs",
    tag = "saved-jobs",
    responses(
        (status = 200, description = "The caller's saved jobs, newest first", body = Vec<SavedJobWithJobResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn my_saved_jobs(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let items = state.saved_job_service.list_mine(&auth).await?;
    let body = items
        .into_iter()
        .map(|(saved, listing)| SavedJobWithJobResponse {
            saved_job: SavedJobResponse::from(saved),
            job: listing.map(JobListingResponse::from),
        })
        .collect::<Vec<_>>();
    Ok(Json(body))
}
