pub mod applications;
pub mod auth;
pub mod company;
pub mod docs;
pub mod extract;
pub mod health;
pub mod jobs;
pub mod profile;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::middleware::{
    cors::cors_layer,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Assemble the full HTTP surface. Auth endpoints and the rest of the API sit
/// behind separate rate limiters.
pub fn router(state: AppState) -> Result<Router> {
    let config = state.config.clone();

    let auth_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .layer(from_fn_with_state(
            RateLimiter::new(config.auth_rps),
            rps_middleware,
        ));

    let public_api = Router::new()
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            get(jobs::get_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/api/jobs/:id/save",
            post(jobs::save_job).delete(jobs::unsave_job),
        )
        .route("/api/jobs/:id/apply", post(jobs::apply_to_job))
        .route(
            "/api/jobs/:id/applications",
            get(jobs::list_job_applications),
        )
        .route(
            "/api/applications/:id/status",
            patch(applications::update_application_status),
        )
        .route(
            "/api/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route("/api/profile/applications", get(profile::my_applications))
        .route("/api/profile/saved-jobs", get(profile::my_saved_jobs))
        .route(
            "/api/company/profile",
            get(company::get_company_profile).patch(company::update_company_profile),
        )
        .route("/api/company/jobs", get(company::list_company_jobs))
        .route("/api/companies/:id", get(company::get_company))
        .layer(from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi_json))
        .merge(auth_api)
        .merge(public_api)
        .with_state(state)
        .layer(cors_layer(config.cors_origin.as_deref())?)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    Ok(app)
}
