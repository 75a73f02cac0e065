use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, SuccessResponse, UserResponse},
    error::{Error, Result},
    middleware::auth::{AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    routes::extract::ApiJson,
    services::auth_service::SessionTokens,
    AppState,
};

fn session_cookie(name: &'static str, value: String, max_age: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(cookie::time::Duration::seconds(max_age.num_seconds()))
        .build()
}

fn set_session_cookies(jar: CookieJar, state: &AppState, tokens: &SessionTokens) -> CookieJar {
    let secure = state.config.cookie_secure;
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access.token.clone(),
        state.tokens.access_ttl(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh.token.clone(),
        state.tokens.refresh_ttl(),
        secure,
    ))
}

fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.auth_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in, session cookies set", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let tokens = state.auth_service.login(payload).await?;
    let jar = set_session_cookies(jar, &state, &tokens);
    Ok((
        jar,
        Json(AuthResponse {
            user: UserResponse::from(tokens.user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "Session rotated, new cookies set", body = AuthResponse),
        (status = 401, description = "Missing, invalid or expired refresh token")
    )
)]
#[axum::debug_handler]
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some(token) = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()) else {
        let err = Error::Unauthorized("Missing refresh token".to_string());
        return Ok((clear_session_cookies(jar), err).into_response());
    };

    match state.auth_service.refresh(&token).await {
        Ok(tokens) => {
            let jar = set_session_cookies(jar, &state, &tokens);
            let body = Json(AuthResponse {
                user: UserResponse::from(tokens.user),
            });
            Ok((jar, body).into_response())
        }
        Err(err @ Error::Unauthorized(_)) => Ok((clear_session_cookies(jar), err).into_response()),
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended, cookies cleared", body = SuccessResponse)
    )
)]
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    let token = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());
    state.auth_service.logout(token.as_deref()).await?;
    Ok((clear_session_cookies(jar), Json(SuccessResponse::ok())))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The authenticated user", body = AuthResponse),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let user = state.auth_service.current_user(auth.user_id).await?;
    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
    }))
}
