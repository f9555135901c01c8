//! Application configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! Every section is optional; missing values fall back to the defaults below.
//! The API credential is deliberately absent: it belongs to the session.

use crate::core::constants::generation;
use crate::core::provider::ProviderType;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default generation request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Default article fetch timeout in seconds
const DEFAULT_FETCH_TIMEOUT: u64 = 30;

/// Default server port
const DEFAULT_PORT: u16 = 8501;

/// Default idle time in seconds before a session is dropped
const DEFAULT_SESSION_IDLE_TIMEOUT: u64 = 3600;

/// Default logo display width in pixels
const DEFAULT_LOGO_WIDTH: u32 = 200;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OpenRouterConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_session_idle_timeout")]
    pub session_idle_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            session_idle_timeout: default_session_idle_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandingConfig {
    #[serde(default = "default_logo_path")]
    pub logo_path: PathBuf,
    #[serde(default = "default_logo_width")]
    pub logo_width: u32,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            logo_path: default_logo_path(),
            logo_width: default_logo_width(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    generation::DEFAULT_MODEL.to_string()
}

fn default_max_output_tokens() -> u32 {
    generation::DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_system_prompt() -> String {
    generation::SYSTEM_PROMPT.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_idle_timeout() -> u64 {
    DEFAULT_SESSION_IDLE_TIMEOUT
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT
}

fn default_logo_path() -> PathBuf {
    PathBuf::from("./tim_logo.png")
}

fn default_logo_width() -> u32 {
    DEFAULT_LOGO_WIDTH
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai: OpenAIConfig::default(),
            openrouter: OpenRouterConfig::default(),
            generation: GenerationConfig::default(),
            server: ServerConfig::default(),
            request: RequestConfig::default(),
            branding: BrandingConfig::default(),
        }
    }
}

/// Application configuration, validated once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider type (OpenAI or OpenRouter)
    pub provider: ProviderType,

    /// Chat-completion API base URL
    pub base_url: String,

    /// Azure API version (for Azure OpenAI deployments)
    pub azure_api_version: Option<String>,

    /// OpenRouter attribution headers
    pub openrouter_site_url: Option<String>,
    pub openrouter_app_name: Option<String>,

    /// Model identifier sent with every completion
    pub model: String,

    /// Completion token ceiling
    pub max_output_tokens: u32,

    /// System instruction sent ahead of every prompt
    pub system_prompt: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Seconds a session may sit unused before it is dropped
    pub session_idle_timeout: u64,

    /// Generation request timeout in seconds
    pub request_timeout: u64,

    /// Article fetch timeout in seconds
    pub fetch_timeout: u64,

    /// Branding image shown at the top of every page
    pub logo_path: PathBuf,

    /// Logo display width in pixels
    pub logo_width: u32,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Self::from_toml(config)
    }

    fn from_toml(config: TomlConfig) -> Result<Self> {
        let provider = ProviderType::from_str(&config.provider)
            .context("Invalid provider value. Must be one of: openai, openrouter")?;

        let (base_url, azure_api_version, openrouter_site_url, openrouter_app_name) =
            match provider {
                ProviderType::OpenAI => (
                    config
                        .openai
                        .base_url
                        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                    config.openai.azure_api_version,
                    None,
                    None,
                ),
                ProviderType::OpenRouter => (
                    config
                        .openrouter
                        .base_url
                        .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
                    None,
                    config.openrouter.site_url,
                    config.openrouter.app_name,
                ),
            };

        if base_url.trim().is_empty() {
            bail!("Provider base_url must not be empty");
        }
        if config.generation.max_output_tokens == 0 {
            bail!("generation.max_output_tokens must be greater than zero");
        }
        if config.generation.model.trim().is_empty() {
            bail!("generation.model must not be empty");
        }
        if config.server.session_idle_timeout == 0 {
            bail!("server.session_idle_timeout must be greater than zero");
        }

        Ok(Config {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            azure_api_version,
            openrouter_site_url,
            openrouter_app_name,
            model: config.generation.model,
            max_output_tokens: config.generation.max_output_tokens,
            system_prompt: config.generation.system_prompt,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            session_idle_timeout: config.server.session_idle_timeout,
            request_timeout: config.request.request_timeout,
            fetch_timeout: config.request.fetch_timeout,
            logo_path: config.branding.logo_path,
            logo_width: config.branding.logo_width,
        })
    }

    /// Load configuration from environment and config file
    ///
    /// Looks for config.toml in current directory by default. A missing file
    /// yields the built-in defaults; an unreadable or invalid one is an error.
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        if Path::new(&config_path).exists() {
            Self::from_file(config_path)
        } else {
            Self::from_toml(TomlConfig::default())
        }
    }
}
