//! PromptForge configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::composer::PromptComposer;
use crate::controller::Timings;

/// Main PromptForge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Directory holding `{template_id}.pmt` skeleton overrides
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,

    /// Delays and animation speed
    pub timing: TimingConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .promptforge.yml
        let local_config = PathBuf::from(".promptforge.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/promptforge/promptforge.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    ///
    /// Errors are swallowed here; `load` reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => std::iter::once(PathBuf::from(".promptforge.yml"))
                .chain(Self::user_config_path())
                .collect(),
        };

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .and_then(|config| config.log_level)
    }

    /// Skeleton override directory with `~` expanded
    pub fn prompts_dir(&self) -> Option<PathBuf> {
        self.prompts_dir.as_ref().map(|p| expand_home(p))
    }

    /// Build a composer honouring `prompts-dir`
    pub fn composer(&self) -> Result<PromptComposer> {
        let composer = match self.prompts_dir() {
            Some(dir) => PromptComposer::with_overrides(&dir)
                .context(format!("Failed to load skeletons with overrides from {}", dir.display()))?,
            None => PromptComposer::embedded_only().context("Failed to load embedded skeletons")?,
        };
        Ok(composer)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("promptforge").join("promptforge.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Delays and animation speed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulated generation time in milliseconds
    #[serde(rename = "generate-delay-ms")]
    pub generate_delay_ms: u64,

    /// Milliseconds per revealed character (0 disables the animation)
    #[serde(rename = "reveal-interval-ms")]
    pub reveal_interval_ms: u64,

    /// How long copy feedback stays visible in milliseconds
    #[serde(rename = "copy-feedback-ms")]
    pub copy_feedback_ms: u64,

    /// TUI tick rate in milliseconds
    #[serde(rename = "tick-rate-ms")]
    pub tick_rate_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            generate_delay_ms: 2000,
            reveal_interval_ms: 20,
            copy_feedback_ms: 2000,
            tick_rate_ms: 33,
        }
    }
}

impl TimingConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            generate_delay: Duration::from_millis(self.generate_delay_ms),
            reveal_interval: Duration::from_millis(self.reveal_interval_ms),
            copy_feedback: Duration::from_millis(self.copy_feedback_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}
