//! Configuration management
//!
//! Settings come from an optional YAML file, then `TUTORIALBOT_*`
//! environment variables. `Settings::init` runs once at startup and the
//! result is passed by reference from there on.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::application::extensions::Ignore;
use crate::infrastructure::http::DEFAULT_TIMEOUT_SECS;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "TUTORIALBOT_";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    pub bot: BotConfig,
    pub log: LogConfig,
    pub extensions: ExtensionsConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub token: String,
    pub secret: String,
    pub client_id: String,
    pub redirect_uri: Option<String>,
    /// `DEV` for development deployments
    pub env: String,
    pub prefixes: Vec<String>,
}

impl BotConfig {
    pub fn is_dev(&self) -> bool {
        self.env.eq_ignore_ascii_case("DEV")
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "tutorialbot".to_string(),
            token: String::new(),
            secret: String::new(),
            client_id: String::new(),
            redirect_uri: None,
            env: "PROD".to_string(),
            prefixes: vec![",".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtensionsConfig {
    /// Root package: a path inside the cwd or a dotted name
    pub root: String,
    /// Anchor for a relative dotted `root`
    pub package: Option<String>,
    pub ignore: Option<IgnoreConfig>,
    /// Directories dotted names are resolved against, in order
    pub module_path: Vec<PathBuf>,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            root: "./extensions".to_string(),
            package: None,
            ignore: None,
            module_path: vec![PathBuf::from(".")],
        }
    }
}

/// Ignore rules as written in the settings file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IgnoreConfig {
    Text(String),
    Prefixes(Vec<String>),
}

impl From<IgnoreConfig> for Ignore {
    fn from(config: IgnoreConfig) -> Self {
        match config {
            IgnoreConfig::Text(text) => Ignore::from(text),
            IgnoreConfig::Prefixes(prefixes) => Ignore::from(prefixes),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load, apply environment overrides and validate; a missing file means defaults
    pub fn init(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut settings = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        settings.apply_env(std::env::vars())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Apply `TUTORIALBOT_*` overrides; unrelated variables are skipped
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(key) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match key {
                "BOT_NAME" => self.bot.name = value,
                "BOT_TOKEN" => self.bot.token = value,
                "BOT_SECRET" => self.bot.secret = value,
                "BOT_CLIENT_ID" => self.bot.client_id = value,
                "BOT_REDIRECT_URI" => self.bot.redirect_uri = Some(value),
                "BOT_ENV" => self.bot.env = value,
                "BOT_PREFIXES" => {
                    self.bot.prefixes = value
                        .split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                }
                "LOG_LEVEL" => self.log.level = value,
                "EXTENSIONS_ROOT" => self.extensions.root = value,
                "HTTP_TIMEOUT_SECS" => {
                    self.http.timeout_secs = value.parse().map_err(|_| {
                        ConfigError::InvalidValue(format!("{}HTTP_TIMEOUT_SECS={}", ENV_PREFIX, value))
                    })?
                }
                other => tracing::debug!("Ignoring unknown setting {}{}", ENV_PREFIX, other),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.module_path.is_empty() {
            return Err(ConfigError::MissingField("extensions.module-path".to_string()));
        }
        Ok(())
    }

    /// The gateway token; only needed to run the bot
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        let token = self.bot.token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingField("bot.token".to_string()));
        }
        Ok(token)
    }

    /// The ignore rules for discovery
    pub fn extension_ignore(&self) -> Option<Ignore> {
        self.extensions.ignore.clone().map(Ignore::from)
    }
}
