use std::env;

use chrono_tz::Tz;
use custodian_application::{NotificationSettings, RetentionSettings};
use custodian_core::{AppError, AppResult};
use custodian_infrastructure::HttpEmailRelayConfig;

const DEFAULT_TIME_ZONE: &str = "America/Fortaleza";
const DEFAULT_RELAY_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone)]
pub enum EmailRelayConfig {
    Console,
    Http(HttpEmailRelayConfig),
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub purge: String,
    pub warning: String,
    pub expired: String,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub time_zone: Tz,
    pub retention: RetentionSettings,
    pub notifications: NotificationSettings,
    pub email_relay: EmailRelayConfig,
    pub schedules: ScheduleConfig,
}

impl WorkerConfig {
    pub fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let time_zone = parse_time_zone(
            env::var("CUSTODIAN_TIME_ZONE")
                .unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_owned())
                .as_str(),
        )?;

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

        let warning_window_days = parse_env_u32("LICENSE_WARNING_DAYS", 30)?;
        if warning_window_days == 0 {
            return Err(AppError::Validation(
                "LICENSE_WARNING_DAYS must be greater than zero".to_owned(),
            ));
        }
        let notifications = NotificationSettings {
            time_zone,
            warning_window_days,
            recipient_email: required_non_empty_env("NOTIFICATION_RECIPIENT_EMAIL")?,
            from_email: required_non_empty_env("NOTIFICATION_FROM_EMAIL")?,
            from_name: env_or("NOTIFICATION_FROM_NAME", "Custodian"),
            warning_template_id: env_or("EMAIL_TEMPLATE_WARNING", "template_license_warning"),
            expired_template_id: env_or("EMAIL_TEMPLATE_EXPIRED", "template_license_expired"),
        };

        let email_relay = match env_or("EMAIL_RELAY_PROVIDER", "console").as_str() {
            "console" => EmailRelayConfig::Console,
            "http" => EmailRelayConfig::Http(HttpEmailRelayConfig {
                endpoint: env_or("EMAIL_RELAY_URL", DEFAULT_RELAY_URL),
                service_id: required_non_empty_env("EMAIL_RELAY_SERVICE_ID")?,
                user_id: required_non_empty_env("EMAIL_RELAY_USER_ID")?,
            }),
            other => {
                return Err(AppError::Validation(format!(
                    "EMAIL_RELAY_PROVIDER must be either 'console' or 'http', got '{other}'"
                )));
            }
        };

        let schedules = ScheduleConfig {
            purge: env_or("PURGE_SCHEDULE", "0 2 * * 0"),
            warning: env_or("WARNING_SCHEDULE", "0 10 * * *"),
            expired: env_or("EXPIRED_SCHEDULE", "30 10 * * *"),
        };

        Ok(Self {
            database_url,
            time_zone,
            retention,
            notifications,
            email_relay,
            schedules,
        })
    }
}

fn parse_time_zone(value: &str) -> AppResult<Tz> {
    value.trim().parse::<Tz>().map_err(|error| {
        AppError::Validation(format!("invalid CUSTODIAN_TIME_ZONE '{value}': {error}"))
    })
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> AppResult<usize> {
    match env::var(name) {
        Ok(value) => value.parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
