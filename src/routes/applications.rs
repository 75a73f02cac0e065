use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplicationResponse, UpdateApplicationStatusPayload},
    error::Result,
    middleware::auth::AuthUser,
    routes::extract::{ApiJson, ApiPath},
    AppState,
};

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/status",
    tag = "applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = ApplicationResponse),
        (status = 403, description = "Application is for another company's job"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .update_status(&auth, id, payload.status)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}
