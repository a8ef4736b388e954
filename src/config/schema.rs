use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the default database - computed, not serialized
    #[serde(skip)]
    pub config_dir: PathBuf,
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub quota: QuotaConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub safety: SafetyConfig,
}

fn default_log_level() -> String {
    "info".into()
}

// ── Provider ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "openai".into()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Reliability ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_backoff_ms() -> u64 {
    500
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

// ── Quota ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_free_daily_limit")]
    pub free_daily_limit: u32,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: u32,
}

fn default_free_daily_limit() -> u32 {
    10
}

fn default_warning_threshold() -> u32 {
    3
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_daily_limit: default_free_daily_limit(),
            warning_threshold: default_warning_threshold(),
        }
    }
}

// ── Storage ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file; defaults to `coach.db` next to config.toml
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ── Conversation ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

fn default_max_messages() -> usize {
    200
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
        }
    }
}

// ── Safety ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Optional TOML file replacing the built-in keyword tables
    #[serde(default)]
    pub keywords_path: Option<PathBuf>,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_max_message_chars() -> usize {
    2_000
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            keywords_path: None,
            max_message_chars: default_max_message_chars(),
        }
    }
}

// ── Config ───────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let config_dir = home.join(".next-chapter");

        Self {
            config_path: config_dir.join("config.toml"),
            config_dir,
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            reliability: ReliabilityConfig::default(),
            quota: QuotaConfig::default(),
            storage: StorageConfig::default(),
            conversation: ConversationConfig::default(),
            safety: SafetyConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(home.join(".next-chapter"))
    }

    /// Load `config.toml` from `config_dir`, writing defaults on first run.
    pub fn load_or_init_in(config_dir: PathBuf) -> Result<Self> {
        let config_path = config_dir.join("config.toml");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed paths that are skipped during serialization
            config.config_path.clone_from(&config_path);
            config.config_dir.clone_from(&config_dir);
            config
        } else {
            let config = Self {
                config_path: config_path.clone(),
                config_dir: config_dir.clone(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: NEXT_CHAPTER_API_KEY or OPENAI_API_KEY
        if let Ok(key) =
            std::env::var("NEXT_CHAPTER_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY"))
            && !key.is_empty()
        {
            self.provider.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("NEXT_CHAPTER_MODEL")
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(base_url) = std::env::var("NEXT_CHAPTER_BASE_URL")
            && !base_url.is_empty()
        {
            self.provider.base_url = base_url;
        }

        if let Ok(path) = std::env::var("NEXT_CHAPTER_DB_PATH")
            && !path.is_empty()
        {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(level) = std::env::var("NEXT_CHAPTER_LOG_LEVEL")
            && !level.is_empty()
        {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::Validation(format!(
                "provider.temperature must be within 0.0..=2.0, got {}",
                self.provider.temperature
            )));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider.model must not be empty".into(),
            ));
        }
        if self.quota.free_daily_limit == 0 {
            return Err(ConfigError::Validation(
                "quota.free_daily_limit must be at least 1".into(),
            ));
        }
        if self.quota.warning_threshold > self.quota.free_daily_limit {
            return Err(ConfigError::Validation(format!(
                "quota.warning_threshold ({}) exceeds quota.free_daily_limit ({})",
                self.quota.warning_threshold, self.quota.free_daily_limit
            )));
        }
        if self.conversation.max_messages < 2 {
            return Err(ConfigError::Validation(
                "conversation.max_messages must keep at least one exchange".into(),
            ));
        }
        Ok(())
    }

    /// Resolved database path for the sqlite backend.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| self.config_dir.join("coach.db"))
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
