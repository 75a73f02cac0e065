#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use jobboard_backend::{
    config::{Config, LogFormat, StorageBackend},
    database::{memory::MemoryRepository, repository::Repositories},
    routes, AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: JsonValue,
}

impl TestResponse {
    /// `name=value` pairs from every Set-Cookie header.
    pub fn cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .collect()
    }

    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookies().into_iter().find_map(|c| {
            let pair = c.split(';').next()?.trim().to_string();
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryRepository,
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        storage: StorageBackend::Memory,
        database_url: None,
        db_max_connections: 1,
        jwt_access_secret: "test-access-secret".into(),
        jwt_refresh_secret: "test-refresh-secret".into(),
        access_token_ttl_minutes: 15,
        refresh_token_ttl_days: 7,
        cookie_secure: false,
        cors_origin: None,
        auth_rps: 10_000,
        public_rps: 10_000,
        session_purge_interval_secs: 600,
        log_format: LogFormat::Text,
    }
}

pub fn spawn_app_with(config: Config) -> TestApp {
    let store = MemoryRepository::new();
    let state = AppState::new(config, Repositories::from_adapter(store.clone()));
    let router = routes::router(state).expect("router");
    TestApp { router, store }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

/// Cookie header value carrying both session tokens.
#[derive(Clone, Debug)]
pub struct Session {
    pub access: String,
    pub refresh: String,
    pub user: JsonValue,
}

impl Session {
    pub fn cookie(&self) -> String {
        format!("accessToken={}; refreshToken={}", self.access, self.refresh)
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<JsonValue>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, session: Option<&Session>) -> TestResponse {
        let cookie = session.map(Session::cookie);
        self.request(Method::GET, uri, cookie.as_deref(), None).await
    }

    pub async fn register(&self, email: &str, role: &str, company_name: Option<&str>) -> TestResponse {
        let mut body = json!({
            "name": "Test Person",
            "email": email,
            "password": "correct-horse-battery",
            "role": role,
        });
        if let Some(name) = company_name {
            body["companyName"] = json!(name);
        }
        self.request(Method::POST, "/api/auth/register", None, Some(body))
            .await
    }

    pub async fn login(&self, email: &str) -> Session {
        let resp = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": "correct-horse-battery" })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "login failed: {}", resp.body);
        Session {
            access: resp.cookie_value("accessToken").expect("access cookie"),
            refresh: resp.cookie_value("refreshToken").expect("refresh cookie"),
            user: resp.body["user"].clone(),
        }
    }

    pub async fn job_seeker(&self, email: &str) -> Session {
        let resp = self.register(email, "USER", None).await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        self.login(email).await
    }

    pub async fn company(&self, email: &str, name: &str) -> Session {
        let resp = self.register(email, "COMPANY", Some(name)).await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        self.login(email).await
    }

    /// Create a job as `company`; `overrides` is merged over a valid payload.
    pub async fn create_job(&self, company: &Session, overrides: JsonValue) -> JsonValue {
        let mut body = json!({
            "title": "Rust backend engineer",
            "description": "Own our HTTP services end to end.",
            "skills": ["rust", "postgres"],
            "salaryMin": 90000,
            "salaryMax": 120000,
            "location": "Berlin",
            "locationType": "ONSITE",
            "jobType": "FULL_TIME",
            "experienceLevel": "SENIOR",
            "status": "OPEN",
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        let resp = self
            .request(Method::POST, "/api/jobs", Some(&company.cookie()), Some(body))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        resp.body
    }
}
