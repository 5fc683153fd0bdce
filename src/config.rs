use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub email: EmailConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API; the production deployment sets exactly
    /// one, the public site URL.
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds.
    pub max_age_seconds: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per identifier within one window.
    pub max_requests: u32,
    pub window_seconds: u64,
    /// How often the sweep task evicts expired records.
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmailConfig {
    /// Transactional email provider API key. Empty means not configured and
    /// the contact endpoint answers 503.
    pub api_key: String,
    /// Recipient of the admin notification.
    pub admin_email: String,
    /// Sender address for both outbound messages.
    pub sender_email: String,
    pub sender_name: String,
    /// Provider endpoint base; overridable so tests can point at a mock.
    pub api_base_url: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
    pub enable_swagger: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: true,
            max_age_seconds: 86400,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_seconds: 3600,
            cleanup_interval_seconds: 300,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            admin_email: String::new(),
            sender_email: String::new(),
            sender_name: "Portfolio".to_string(),
            api_base_url: "https://api.brevo.com".to_string(),
            enabled: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: "/api".to_string(),
            enable_swagger: false,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. Portfolio.toml (base configuration file)
    /// 3. Environment variables (prefixed with PORTFOLIO_, double underscore
    ///    as the section separator, e.g. PORTFOLIO_EMAIL__API_KEY)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::string(&toml::to_string(&Config::default()).expect("defaults serialize")).nested())
            .merge(Toml::file("Portfolio.toml").nested())
            .merge(Env::prefixed("PORTFOLIO_").split("__"));

        figment.extract()
    }
}
