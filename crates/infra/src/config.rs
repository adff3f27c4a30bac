use tracing::{info, warn};

/// SMTP relay used to deliver reminder emails
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Mailbox the emails are sent from, e.g. `Appointer <no-reply@example.com>`
    pub from: String,
}

/// Admin api of the identity provider that owns the `User`s
#[derive(Debug, Clone)]
pub struct UserDirectoryConfig {
    pub base_url: String,
    pub service_role_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the reminder dispatcher sweeps for due reminders
    pub reminder_sweep_interval: std::time::Duration,
    /// Reminders of appointments that are older than this are never sent.
    /// Bounds the retries of failing reminders and avoids a storm of stale
    /// emails after downtime.
    pub reminder_retention: chrono::Duration,
    pub smtp: Option<SmtpConfig>,
    pub user_directory: Option<UserDirectoryConfig>,
}

fn parse_env_or<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl SmtpConfig {
    pub fn from_env() -> Option<Self> {
        let host = match std::env::var("SMTP_HOST") {
            Ok(host) => host,
            Err(_) => {
                info!("Did not find SMTP_HOST environment variable.");
                return None;
            }
        };
        Some(Self {
            host,
            port: parse_env_or("SMTP_PORT", 587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Appointer <no-reply@appointer.local>".into()),
        })
    }
}

impl UserDirectoryConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("SUPABASE_URL").ok();
        let service_role_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok();
        match (base_url, service_role_key) {
            (Some(base_url), Some(service_role_key)) => Some(Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                service_role_key,
            }),
            _ => {
                info!("Did not find SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY environment variables.");
                None
            }
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_or("PORT", 5000);
        let sweep_interval_secs: u64 = parse_env_or("REMINDER_SWEEP_INTERVAL_SECS", 60);
        let sweep_interval_secs = if sweep_interval_secs == 0 {
            warn!("REMINDER_SWEEP_INTERVAL_SECS cannot be 0, falling back to 60 seconds.");
            60
        } else {
            sweep_interval_secs
        };
        let retention_hours: i64 = parse_env_or("REMINDER_RETENTION_HOURS", DEFAULT_RETENTION_HOURS);

        Self {
            port,
            reminder_sweep_interval: std::time::Duration::from_secs(sweep_interval_secs),
            reminder_retention: retention_from_hours(retention_hours),
            smtp: SmtpConfig::from_env(),
            user_directory: UserDirectoryConfig::from_env(),
        }
    }
}

const DEFAULT_RETENTION_HOURS: i64 = 24;

fn retention_from_hours(hours: i64) -> chrono::Duration {
    match chrono::Duration::try_hours(hours) {
        Some(retention) if hours >= 0 => retention,
        _ => {
            warn!(
                "REMINDER_RETENTION_HOURS is out of range: {}. Falling back to {} hours.",
                hours, DEFAULT_RETENTION_HOURS
            );
            chrono::Duration::hours(DEFAULT_RETENTION_HOURS)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
