use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub auth_rps: u32,
    pub public_rps: u32,
    pub session_purge_interval_secs: u64,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage = get_env_or("STORAGE", StorageBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            storage,
            database_url,
            db_max_connections: get_env_or("DB_MAX_CONNECTIONS", 20)?,
            jwt_access_secret: get_env("JWT_ACCESS_SECRET")?,
            jwt_refresh_secret: get_env("JWT_REFRESH_SECRET")?,
            access_token_ttl_minutes: get_env_or("ACCESS_TOKEN_TTL_MINUTES", 15)?,
            refresh_token_ttl_days: get_env_or("REFRESH_TOKEN_TTL_DAYS", 7)?,
            cookie_secure: get_env_or("COOKIE_SECURE", true)?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            auth_rps: get_env_or("AUTH_RPS", 10)?,
            public_rps: get_env_or("PUBLIC_RPS", 100)?,
            session_purge_interval_secs: get_env_or("SESSION_PURGE_INTERVAL_SECS", 600)?,
            log_format: get_env_or("LOG_FORMAT", LogFormat::Text)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
