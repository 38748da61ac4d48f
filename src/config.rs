use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const BACKEND_PORT: u16 = 8000;
pub const FRONTEND_PORT: u16 = 5173;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn urls(self) -> &'static UrlSet {
        match self {
            Environment::Production => &PRODUCTION_URLS,
            Environment::Development => &DEVELOPMENT_URLS,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Fixed URL table for one deployment environment.
#[derive(Debug, PartialEq, Eq)]
pub struct UrlSet {
    pub api: &'static str,
    pub frontend: &'static str,
    pub docs: &'static str,
    pub github: &'static str,
    pub bolt: &'static str,
}

pub static PRODUCTION_URLS: UrlSet = UrlSet {
    api: "https://truthlens-backend-production-b9e0.up.railway.app",
    frontend: "https://truthlensai.netlify.app",
    docs: "https://truthlens-backend-production-b9e0.up.railway.app/docs",
    github: "https://github.com/ignacioai/truthlens",
    bolt: "https://bolt.new",
};

pub static DEVELOPMENT_URLS: UrlSet = UrlSet {
    api: "http://localhost:8000",
    frontend: "http://localhost:5173",
    docs: "http://localhost:8000/docs",
    github: "https://github.com/ignaciozai/truthlens",
    bolt: "https://bolt.new",
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment '{0}', expected 'development' or 'production'")]
    UnknownEnvironment(String),

    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Resolves the deployment environment from a build flag and an optional
/// environment string. An unrecognised string falls back to the build flag.
pub fn resolve_environment(build_is_production: bool, env_override: Option<&str>) -> Environment {
    let requested = env_override.and_then(|s| s.parse::<Environment>().ok());
    if build_is_production || requested == Some(Environment::Production) {
        Environment::Production
    } else {
        Environment::Development
    }
}

pub fn resolve_api_base(api_override: Option<&str>, env: Environment) -> String {
    match api_override.filter(|s| !s.is_empty()) {
        Some(base) => base.to_string(),
        None => env.urls().api.to_string(),
    }
}

pub fn frontend_url(env: Environment) -> &'static str {
    env.urls().frontend
}

pub fn docs_url(env: Environment) -> &'static str {
    env.urls().docs
}

pub fn github_url() -> &'static str {
    PRODUCTION_URLS.github
}

pub fn bolt_url() -> &'static str {
    PRODUCTION_URLS.bolt
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub api_base_url: String,
    pub frontend_url: String,
    pub api: ApiSettings,
    pub health_check_enabled: bool,
}

impl Config {
    pub fn from_parts(
        build_is_production: bool,
        env_override: Option<&str>,
        api_override: Option<&str>,
    ) -> Self {
        let environment = resolve_environment(build_is_production, env_override);
        Self {
            environment,
            api_base_url: resolve_api_base(api_override, environment),
            frontend_url: frontend_url(environment).to_string(),
            api: ApiSettings::default(),
            health_check_enabled: true,
        }
    }

    /// Reads the `TRUTHLENS_*` process environment. Nothing is logged here so
    /// callers can apply their own overrides before [`Config::log_summary`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(cfg!(not(debug_assertions)), |name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source. Blank numeric values keep
    /// the defaults; malformed ones are an error.
    pub fn from_lookup<F>(build_is_production: bool, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_override = lookup("TRUTHLENS_ENV");
        let api_override = lookup("TRUTHLENS_API_BASE_URL");

        let mut config = Self::from_parts(
            build_is_production,
            env_override.as_deref(),
            api_override.as_deref(),
        );

        if let Some(ms) = parse_number::<u64>("TRUTHLENS_TIMEOUT_MS", &lookup)? {
            config.api.timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = parse_number::<u32>("TRUTHLENS_RETRY_ATTEMPTS", &lookup)? {
            config.api.retry_attempts = attempts;
        }
        if let Some(ms) = parse_number::<u64>("TRUTHLENS_RETRY_DELAY_MS", &lookup)? {
            config.api.retry_delay = Duration::from_millis(ms);
        }
        config.health_check_enabled = lookup("TRUTHLENS_HEALTH_CHECK")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "off" | "false" | "0"))
            .unwrap_or(true);

        Ok(config)
    }

    pub fn log_summary(&self) {
        log::info!(
            "API configuration: environment={} base_url={} frontend_url={} health_check={}",
            self.environment,
            self.api_base_url,
            self.frontend_url,
            self.health_check_enabled
        );
    }
}

fn parse_number<T: FromStr>(
    var: &'static str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        _ => Ok(None),
    }
}
