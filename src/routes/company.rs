use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        job_dto::JobListingResponse,
        profile_dto::{CompanyPageResponse, CompanyResponse, UpdateCompanyPayload},
    },
    error::Result,
    middleware::auth::AuthUser,
    routes::extract::{ApiJson, ApiPath},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/company/profile",
    tag = "companies",
    responses(
        (status = 200, description = "The caller's company", body = CompanyResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a company account")
    )
)]
#[axum::debug_handler]
pub async fn get_company_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let company = state.company_service.get_mine(&auth).await?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    patch,
    path = "/api/company/profile",
    tag = "companies",
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not a company account")
    )
)]
#[axum::debug_handler]
pub async fn update_company_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.update_mine(&auth, payload).await?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    get,
    path = "/api/company/jobs",
    tag = "companies",
    responses(
        (status = 200, description = "Every job of the caller's company", body = Vec<JobListingResponse>),
        (status = 403, description = "Not a company account")
    )
)]
#[axum::debug_handler]
pub async fn list_company_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_for_company(&auth).await?;
    Ok(Json(
        jobs.into_iter()
            .map(JobListingResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "companies",
    params(("id" = Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Public company page with open jobs", body = CompanyPageResponse),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let (company, jobs) = state.company_service.public_page(id).await?;
    Ok(Json(CompanyPageResponse {
        company: CompanyResponse::from(company),
        jobs: jobs.into_iter().map(JobListingResponse::from).collect(),
    }))
}
