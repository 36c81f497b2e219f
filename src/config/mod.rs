use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub limits: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Seconds to wait for a connection before a query fails over to the
    /// service-unavailable path.
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// How many most-recent entries per audience the admin summary returns.
    pub recent_entries_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// The single origin allowed by CORS.
    pub cors_origin: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Identities allowed to hold an admin session. Authentication success
    /// alone never grants admin capability.
    pub admin_emails: Vec<String>,
    /// Subset of admins with the super-admin flag in their session.
    pub super_admin_emails: Vec<String>,
    /// Credential records for the built-in identity provider, as
    /// `email:sha256-hex` pairs.
    pub auth_users: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub waitlist_max: u32,
    pub waitlist_window_secs: u64,
    pub login_max: u32,
    pub login_window_secs: u64,
    pub admin_read_max: u32,
    pub admin_read_window_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment picks the defaults; specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("FYNDA_RECENT_ENTRIES_LIMIT") {
            self.api.recent_entries_limit = v.parse().unwrap_or(self.api.recent_entries_limit);
        }

        // Security overrides
        if let Ok(v) = env::var("FYNDA_CORS_ORIGIN") {
            self.security.cors_origin = v;
        }
        if let Ok(v) = env::var("FYNDA_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("FYNDA_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("FYNDA_ADMIN_EMAILS") {
            self.security.admin_emails = split_list(&v);
        }
        if let Ok(v) = env::var("FYNDA_SUPER_ADMIN_EMAILS") {
            self.security.super_admin_emails = split_list(&v);
        }
        if let Ok(v) = env::var("FYNDA_AUTH_USERS") {
            self.security.auth_users = parse_auth_users(&v);
        }

        // Rate limit overrides
        if let Ok(v) = env::var("FYNDA_RATE_LIMITING") {
            self.limits.enabled = v.parse().unwrap_or(self.limits.enabled);
        }
        if let Ok(v) = env::var("FYNDA_WAITLIST_RATE_MAX") {
            self.limits.waitlist_max = v.parse().unwrap_or(self.limits.waitlist_max);
        }
        if let Ok(v) = env::var("FYNDA_WAITLIST_RATE_WINDOW_SECS") {
            self.limits.waitlist_window_secs =
                v.parse().unwrap_or(self.limits.waitlist_window_secs);
        }
        if let Ok(v) = env::var("FYNDA_LOGIN_RATE_MAX") {
            self.limits.login_max = v.parse().unwrap_or(self.limits.login_max);
        }
        if let Ok(v) = env::var("FYNDA_LOGIN_RATE_WINDOW_SECS") {
            self.limits.login_window_secs = v.parse().unwrap_or(self.limits.login_window_secs);
        }
        if let Ok(v) = env::var("FYNDA_ADMIN_READ_RATE_MAX") {
            self.limits.admin_read_max = v.parse().unwrap_or(self.limits.admin_read_max);
        }
        if let Ok(v) = env::var("FYNDA_ADMIN_READ_RATE_WINDOW_SECS") {
            self.limits.admin_read_window_secs =
                v.parse().unwrap_or(self.limits.admin_read_window_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 5,
                acquire_timeout_secs: 3,
            },
            api: ApiConfig {
                recent_entries_limit: 10,
            },
            security: SecurityConfig {
                cors_origin: "http://localhost:5173".to_string(),
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                admin_emails: Vec::new(),
                super_admin_emails: Vec::new(),
                auth_users: Vec::new(),
            },
            limits: RateLimitConfig {
                enabled: false,
                waitlist_max: 1,
                waitlist_window_secs: 60,
                login_max: 5,
                login_window_secs: 900,
                admin_read_max: 30,
                admin_read_window_secs: 60,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 5,
            },
            api: ApiConfig {
                recent_entries_limit: 10,
            },
            security: SecurityConfig {
                cors_origin: "https://staging.fynda.io".to_string(),
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                admin_emails: Vec::new(),
                super_admin_emails: Vec::new(),
                auth_users: Vec::new(),
            },
            limits: RateLimitConfig {
                enabled: true,
                waitlist_max: 1,
                waitlist_window_secs: 60,
                login_max: 5,
                login_window_secs: 900,
                admin_read_max: 30,
                admin_read_window_secs: 60,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 5,
            },
            api: ApiConfig {
                recent_entries_limit: 10,
            },
            security: SecurityConfig {
                cors_origin: "https://fynda.io".to_string(),
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                admin_emails: Vec::new(),
                super_admin_emails: Vec::new(),
                auth_users: Vec::new(),
            },
            limits: RateLimitConfig {
                enabled: true,
                waitlist_max: 1,
                waitlist_window_secs: 60,
                login_max: 5,
                login_window_secs: 900,
                admin_read_max: 30,
                admin_read_window_secs: 60,
            },
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `email:sha256hex` pairs, comma separated. Malformed pairs are
/// skipped with a warning rather than taking the process down.
fn parse_auth_users(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let pair = pair.trim();
            if pair.is_empty() {
                return None;
            }
            match pair.split_once(':') {
                Some((email, digest)) if !email.is_empty() && !digest.is_empty() => {
                    Some((email.trim().to_lowercase(), digest.trim().to_string()))
                }
                _ => {
                    tracing::warn!("skipping malformed FYNDA_AUTH_USERS entry");
                    None
                }
            }
        })
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
