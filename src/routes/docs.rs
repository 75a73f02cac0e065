use axum::{response::IntoResponse, Json};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto::{
    application_dto::{
        ApplicantResponse, ApplicantSummary, ApplicationCreatedResponse, ApplicationResponse,
        ApplyPayload, MyApplicationResponse, SavedJobCreatedResponse, SavedJobResponse,
        SavedJobWithJobResponse, UpdateApplicationStatusPayload,
    },
    auth_dto::{AuthResponse, LoginPayload, RegisterPayload, SuccessResponse, UserResponse},
    job_dto::{
        CompanySummary, CreateJobPayload, JobDetailResponse, JobListResponse, JobListingResponse,
        JobResponse, Pagination, UpdateJobPayload,
    },
    profile_dto::{
        CompanyPageResponse, CompanyResponse, UpdateCompanyPayload, UpdateProfilePayload,
    },
};
use crate::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::models::{
    application::ApplicationStatus,
    job::{ExperienceLevel, JobStatus, JobType, LocationType},
    user::Role,
};

struct CookieAuth;

impl Modify for CookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "AccessTokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                ACCESS_TOKEN_COOKIE,
                "Short-lived access token set by POST /api/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&CookieAuth),
    info(title = "Job board API"),
    security(("AccessTokenCookie" = [])),
    paths(
        crate::routes::health::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::jobs::list_jobs,
        crate::routes::jobs::get_job,
        crate::routes::jobs::create_job,
        crate::routes::jobs::update_job,
        crate::routes::jobs::delete_job,
        crate::routes::jobs::save_job,
        crate::routes::jobs::unsave_job,
        crate::routes::jobs::apply_to_job,
        crate::routes::jobs::list_job_applications,
        crate::routes::applications::update_application_status,
        crate::routes::profile::get_profile,
        crate::routes::profile::update_profile,
        crate::routes::profile::my_applications,
        crate::routes::profile::my_saved_jobs,
        crate::routes::company::get_company_profile,
        crate::routes::company::update_company_profile,
        crate::routes::company::list_company_jobs,
        crate::routes::company::get_company,
    ),
    components(schemas(
        Role,
        JobStatus,
        LocationType,
        JobType,
        ExperienceLevel,
        ApplicationStatus,
        RegisterPayload,
        LoginPayload,
        UserResponse,
        AuthResponse,
        SuccessResponse,
        CreateJobPayload,
        UpdateJobPayload,
        JobResponse,
        CompanySummary,
        JobListingResponse,
        JobDetailResponse,
        Pagination,
        JobListResponse,
        ApplyPayload,
        UpdateApplicationStatusPayload,
        ApplicationResponse,
        ApplicationCreatedResponse,
        MyApplicationResponse,
        ApplicantSummary,
        ApplicantResponse,
        SavedJobResponse,
        SavedJobCreatedResponse,
        SavedJobWithJobResponse,
        UpdateProfilePayload,
        UpdateCompanyPayload,
        CompanyResponse,
        CompanyPageResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and cookie sessions"),
        (name = "jobs", description = "Job search and company job management"),
        (name = "saved-jobs", description = "Bookmarked jobs"),
        (name = "applications", description = "Job applications"),
        (name = "profile", description = "The caller's own profile"),
        (name = "companies", description = "Company profiles"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
