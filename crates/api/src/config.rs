use std::path::PathBuf;

/// Default bounded capacity of the enrichment job queue.
pub const DEFAULT_ENRICHMENT_QUEUE_CAPACITY: usize = 256;

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the session cookie (default: `dreamboard_sid`).
    pub cookie_name: String,
    /// Session lifetime in hours (default: `168`, one week).
    pub ttl_hours: i64,
    /// Whether to add the `Secure` attribute to the cookie (default: `false`).
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "dreamboard_sid".into(),
            ttl_hours: 168,
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `SESSION_COOKIE_NAME`   | `dreamboard_sid` |
    /// | `SESSION_TTL_HOURS`     | `168`            |
    /// | `SESSION_COOKIE_SECURE` | `false`          |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.cookie_name);

        let ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| defaults.ttl_hours.to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");

        let cookie_secure = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.cookie_secure);

        Self {
            cookie_name,
            ttl_hours,
            cookie_secure,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the built SPA bundle, if it should be served.
    pub static_dir: Option<PathBuf>,
    /// Capacity of the enrichment job queue (default: `256`).
    pub enrichment_queue_capacity: usize,
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `STATIC_DIR`                | unset                   |
    /// | `ENRICHMENT_QUEUE_CAPACITY` | `256`                   |
    ///
    /// Session settings are read by [`SessionConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let enrichment_queue_capacity: usize = std::env::var("ENRICHMENT_QUEUE_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_ENRICHMENT_QUEUE_CAPACITY.to_string())
            .parse()
            .expect("ENRICHMENT_QUEUE_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            static_dir,
            enrichment_queue_capacity: enrichment_queue_capacity.max(1),
            session: SessionConfig::from_env(),
        }
    }
}
