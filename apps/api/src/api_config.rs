use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use custodian_application::RetentionSettings;
use custodian_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub shared_secret: String,
    pub retention: RetentionSettings,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        // The migrate subcommand never serves requests.
        let shared_secret = if migrate_only {
            env::var("API_SHARED_SECRET").unwrap_or_default()
        } else {
            required_non_empty_env("API_SHARED_SECRET")?
        };

        let defaults = RetentionSettings::default();
        let retention_days = parse_env_u32("AUDIT_RETENTION_DAYS", defaults.retention_days)?;
        let batch_size = parse_env_usize("PURGE_BATCH_SIZE", defaults.batch_size)?;
        let retention = RetentionSettings {
            retention_days,
            batch_size,
            system_actor_email: env::var("SYSTEM_ACTOR_EMAIL")
                .unwrap_or(defaults.system_actor_email),
        };
        retention.validate()?;

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            shared_secret,
            retention,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, AppError> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, AppError> {
    match env::var(name) {
        Ok(value) => value.parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
