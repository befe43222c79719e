use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::api::error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub ip: String,
    pub port: u16,
}

impl AppConfig {
    /// Reads the configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, error::SystemError> {
        dotenvy::dotenv().ok();

        let jwt_secret = required("SECRET_KEY")?;
        let access_token_expiration = parsed("ACCESS_TOKEN_EXPIRATION", "1800")?;
        let database_url = required("DATABASE_URL")?;
        let db_max_connections = parsed("DB_MAX_CONNECTIONS", "5")?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("PORT", "8000")?;

        Ok(AppConfig {
            jwt_secret,
            access_token_expiration,
            database_url,
            db_max_connections,
            cors_origins,
            ip,
            port,
        })
    }
}

fn required(key: &'static str) -> Result<String, error::SystemError> {
    std::env::var(key).map_err(|_| {
        error::SystemError::invalid_config(format!(
            "{key} must be set in .env file or environment variable"
        ))
    })
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: &str) -> Result<T, error::SystemError> {
    let raw = std::env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse::<T>()
        .map_err(|_| error::SystemError::invalid_config(format!("{key} has an invalid value: {raw}")))
}

pub async fn connect_database(config: &AppConfig) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database connected and migrations applied");

    Ok(pool)
}
