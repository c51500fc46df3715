/// Default OpenAI-compatible API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
const DEFAULT_MODEL: &str = "gpt-4o";

/// Default HTTP timeout for a single completion request, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for the completion provider.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// API key. `None` disables outbound calls; every operation then returns
    /// its fallback.
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API (no trailing slash).
    pub base_url: String,
    /// Chat model name.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl AdvisorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                      |
    /// |-----------------------|------------------------------|
    /// | `OPENAI_API_KEY`      | unset (advisor disabled)     |
    /// | `OPENAI_BASE_URL`     | `https://api.openai.com/v1`  |
    /// | `OPENAI_MODEL`        | `gpt-4o`                     |
    /// | `OPENAI_TIMEOUT_SECS` | `60`                         |
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("OPENAI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            base_url,
            model,
            timeout_secs,
        }
    }

    /// A configuration with no API key, for tests and offline development.
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
