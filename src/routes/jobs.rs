use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        application_dto::{
            ApplicantResponse, ApplicationCreatedResponse, ApplicationResponse, ApplyPayload,
            SavedJobCreatedResponse, SavedJobResponse,
        },
        auth_dto::SuccessResponse,
        job_dto::{
            CreateJobPayload, JobDetailResponse, JobListResponse, JobListingResponse, JobResponse,
            JobSearchParams, UpdateJobPayload,
        },
    },
    error::{Error, Result},
    middleware::auth::{AuthUser, MaybeAuthUser},
    routes::extract::{ApiJson, ApiPath, ApiQuery},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "jobs",
    params(
        ("q" = Option<String>, Query, description = "Matches title, description or company name"),
        ("location" = Option<String>, Query, description = "Substring of the job location"),
        ("locationType[]" = Option<Vec<String>>, Query, description = "ONSITE, REMOTE or HYBRID"),
        ("experienceLevel[]" = Option<Vec<String>>, Query, description = "ENTRY through EXECUTIVE"),
        ("jobType[]" = Option<Vec<String>>, Query, description = "FULL_TIME, PART_TIME, CONTRACT, INTERNSHIP or FREELANCE"),
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 50")
    ),
    responses(
        (status = 200, description = "One page of open jobs", body = JobListResponse),
        (status = 400, description = "Unknown filter value")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<JobSearchParams>,
) -> Result<impl IntoResponse> {
    let (items, pagination) = state.job_service.search(params).await?;
    Ok(Json(JobListResponse {
        jobs: items.into_iter().map(JobListingResponse::from).collect(),
        pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job detail; hasApplied/hasSaved present when authenticated", body = JobDetailResponse),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.job_service.view(id, auth.as_ref()).await?;
    Ok(Json(JobDetailResponse {
        listing: JobListingResponse::from(detail.listing),
        has_applied: detail.viewer.map(|v| v.has_applied),
        has_saved: detail.viewer.map(|v| v.has_saved),
    }))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a company account")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(&auth, payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&auth, id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/save",
    tag = "saved-jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 201, description = "Job saved", body = SavedJobCreatedResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job already saved")
    )
)]
#[axum::debug_handler]
pub async fn save_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let saved = state.saved_job_service.save(&auth, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(SavedJobCreatedResponse {
            saved_job: SavedJobResponse::from(saved),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}/save",
    tag = "saved-jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job no longer saved", body = SuccessResponse),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn unsave_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.saved_job_service.unsave(&auth, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    tag = "applications",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body(content = ApplyPayload, description = "May be empty"),
    responses(
        (status = 201, description = "Application submitted", body = ApplicationCreatedResponse),
        (status = 400, description = "Job is not accepting applications"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Only job seekers can apply"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied to this job")
    )
)]
#[axum::debug_handler]
pub async fn apply_to_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        ApplyPayload::default()
    } else {
        serde_json::from_slice::<ApplyPayload>(&body)
            .map_err(|e| Error::BadRequest(format!("Invalid request body: {}", e)))?
    };
    payload.validate()?;

    let application = state.application_service.apply(&auth, id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationCreatedResponse {
            application: ApplicationResponse::from(application),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/applications",
    tag = "applications",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Applications with applicant summaries", body = Vec<ApplicantResponse>),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let applicants = state.application_service.list_for_job(&auth, id).await?;
    Ok(Json(
        applicants
            .into_iter()
            .map(ApplicantResponse::from)
            .collect::<Vec<_>>(),
    ))
}
