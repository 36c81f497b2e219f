use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::database::WaitlistRepository;
use crate::rate_limit::FixedWindowLimiter;
use crate::services::AdminAuthService;

/// Shared application state handed to every handler. Rate limiters and the
/// auth gate live here, scoped to the process, rather than as globals
/// reachable from arbitrary code.
#[derive(Clone)]
pub struct AppState {
    pub config: &'static AppConfig,
    pub pool: PgPool,
    pub repository: Arc<WaitlistRepository>,
    pub admin_auth: Arc<AdminAuthService>,
    pub waitlist_limiter: Arc<FixedWindowLimiter>,
    pub login_limiter: Arc<FixedWindowLimiter>,
    pub admin_read_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(config: &'static AppConfig, pool: PgPool) -> Self {
        let limits = &config.limits;
        Self {
            config,
            pool: pool.clone(),
            repository: Arc::new(WaitlistRepository::new(pool)),
            admin_auth: Arc::new(AdminAuthService::from_config(&config.security)),
            waitlist_limiter: Arc::new(FixedWindowLimiter::new(
                limits.waitlist_max,
                Duration::from_secs(limits.waitlist_window_secs),
            )),
            login_limiter: Arc::new(FixedWindowLimiter::new(
                limits.login_max,
                Duration::from_secs(limits.login_window_secs),
            )),
            admin_read_limiter: Arc::new(FixedWindowLimiter::new(
                limits.admin_read_max,
                Duration::from_secs(limits.admin_read_window_secs),
            )),
        }
    }
}
