use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use overseace_notification::EmailConfig;
use serde::Deserialize;
use std::env;
use validator::ValidateEmail;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub forms: FormsConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where notifications go and how they are branded
#[derive(Debug, Deserialize, Clone)]
pub struct FormsConfig {
    pub recipient: String,
    #[serde(default = "default_company_name")]
    pub company_name: String,
    /// IANA zone for the submission timestamp in emails and the audit log
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_company_name() -> String {
    "OVERSEACE HITECH".to_string()
}

fn default_timezone() -> String {
    "Africa/Dar_es_Salaam".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    #[serde(default = "default_audit_path")]
    pub path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: default_audit_path(),
        }
    }
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_path() -> String {
    "form_submissions.log".to_string()
}

/// Fixed-window limit on submissions per client
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Key clients on the first `X-Forwarded-For` hop. Only safe behind a
    /// proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            trust_forwarded: false,
        }
    }
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (OVERSEACE__EMAIL__SMTP_HOST, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("forms.recipient", "info@overseace.com")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("OVERSEACE")
                .separator("__")
                .try_parsing(true),
        );

        // Names used by the previous deployment
        if let Ok(admin_email) = env::var("ADMIN_EMAIL") {
            builder = builder.set_override("forms.recipient", admin_email)?;
        }
        if let Ok(from_email) = env::var("FROM_EMAIL") {
            builder = builder.set_override("email.from_address", from_email)?;
        }
        if let Ok(smtp_password) = env::var("SMTP_PASSWORD") {
            builder = builder.set_override("email.smtp_password", smtp_password)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !self.forms.recipient.validate_email() {
            return Err(format!(
                "Form recipient '{}' is not a valid email address",
                self.forms.recipient
            ));
        }
        if time_tz::timezones::get_by_name(&self.forms.timezone).is_none() {
            return Err(format!("Unknown timezone '{}'", self.forms.timezone));
        }
        if !self.email.from_address.validate_email() {
            return Err(format!(
                "Sender address '{}' is not a valid email address",
                self.email.from_address
            ));
        }
        if self.email.smtp_timeout_secs == 0 {
            return Err("SMTP timeout must be at least 1 second".to_string());
        }
        if self.audit.enabled && self.audit.path.trim().is_empty() {
            return Err("Audit log path must not be empty".to_string());
        }
        if self.rate_limit.enabled
            && (self.rate_limit.max_requests == 0 || self.rate_limit.window_secs == 0)
        {
            return Err("Rate limit max_requests and window_secs must be at least 1".to_string());
        }
        if self.rate_limit.enabled
            && std::time::Duration::from_secs(self.rate_limit.window_secs)
                / self.rate_limit.max_requests
                == std::time::Duration::ZERO
        {
            return Err("Rate limit max_requests is too large for window_secs".to_string());
        }
        Ok(())
    }
}
