//! Configuration management for the paint agent.
//!
//! Configuration can be set via environment variables:
//! - `GEMINI_API_KEY` - Required. API key for the LLM provider.
//! - `GMAIL_ADDRESS` - Required. Sender address, also the SMTP username.
//! - `GMAIL_APP_PASSWORD` - Required. SMTP app password for the sender.
//! - `LLM_MODEL` - Optional. Model identifier. Defaults to `gemini-1.5-flash`.
//! - `MAX_STEPS` - Optional. Maximum agent loop steps. Defaults to `10`.
//! - `PAINT_COMMAND` - Optional. Paint application executable. Defaults to `mspaint`.
//! - `ARTIFACT_DIR` - Optional. Directory for saved images. Defaults to the
//!   current directory.
//! - `SMTP_HOST` - Optional. SMTP relay host. Defaults to `smtp.gmail.com`.
//! - `SMTP_PORT` - Optional. SMTP relay port. Defaults to `587`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port (587 for STARTTLS)
    pub smtp_port: u16,

    /// Sender address, also used as the SMTP username
    pub address: String,

    /// App password for the sender account
    pub app_password: String,
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider API key
    pub api_key: String,

    /// LLM model identifier
    pub model: String,

    /// Maximum steps for the agent loop
    pub max_steps: usize,

    /// Executable used to launch the paint application
    pub paint_command: String,

    /// Directory that relative save paths resolve against
    pub artifact_dir: PathBuf,

    /// Email transport configuration
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `GEMINI_API_KEY`,
    /// `GMAIL_ADDRESS`, or `GMAIL_APP_PASSWORD` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require("GEMINI_API_KEY")?;
        let address = require("GMAIL_ADDRESS")?;
        let app_password = require("GMAIL_APP_PASSWORD")?;

        let model = std::env::var("LLM_MODEL")
            .unwrap_or_else(|_| "gemini-1.5-flash".to_string());

        let max_steps = std::env::var("MAX_STEPS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_STEPS".to_string(), format!("{}", e)))?;

        let paint_command = std::env::var("PAINT_COMMAND")
            .unwrap_or_else(|_| "mspaint".to_string());

        let artifact_dir = std::env::var("ARTIFACT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let smtp_host = std::env::var("SMTP_HOST")
            .unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let smtp_port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("SMTP_PORT".to_string(), format!("{}", e)))?;

        Ok(Self {
            api_key,
            model,
            max_steps,
            paint_command,
            artifact_dir,
            mail: MailConfig {
                smtp_host,
                smtp_port,
                address,
                app_password,
            },
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model: String, artifact_dir: PathBuf) -> Self {
        Self {
            api_key,
            model,
            max_steps: 10,
            paint_command: "mspaint".to_string(),
            artifact_dir,
            mail: MailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                address: "agent@example.com".to_string(),
                app_password: "app-password".to_string(),
            },
        }
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_credentials() {
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GMAIL_ADDRESS");
        std::env::remove_var("GMAIL_APP_PASSWORD");

        let err = Config::from_env().expect_err("missing credentials should fail");
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));

        std::env::set_var("GEMINI_API_KEY", "key");
        std::env::set_var("GMAIL_ADDRESS", "agent@example.com");
        std::env::set_var("GMAIL_APP_PASSWORD", "secret");

        let config = Config::from_env().expect("load config");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.mail.smtp_port, 587);

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GMAIL_ADDRESS");
        std::env::remove_var("GMAIL_APP_PASSWORD");
    }
}
