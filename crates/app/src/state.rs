use std::{fs, path::PathBuf};

use common::consideration::PLOTS_UNTIL_NEW_SERIES;
use common::crypto::{Identifier, DEFAULT_KEY_COUNT};
use common::session::{Session, SessionConfig};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "mind";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEYS_FILE_NAME: &str = "keys.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Plots per series when stamping considerations
    #[serde(default = "default_plots_until_new_series")]
    pub plots_until_new_series: u64,
    /// Number of keys derived on import
    #[serde(default = "default_key_count")]
    pub key_count: usize,
    /// Percentage of ranking a graph node needs to be shown
    #[serde(default)]
    pub ranking_filter: f64,
    /// Default tracing directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_plots_until_new_series() -> u64 {
    PLOTS_UNTIL_NEW_SERIES
}

fn default_key_count() -> usize {
    DEFAULT_KEY_COUNT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plots_until_new_series: default_plots_until_new_series(),
            key_count: default_key_count(),
            ranking_filter: 0.0,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            plots_until_new_series: self.plots_until_new_series,
            ranking_filter: self.ranking_filter,
        }
    }
}

/// Public identity of an imported mind, as stored in keys.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindRecord {
    pub public_keys: Vec<Identifier>,
    #[serde(default)]
    pub selected: usize,
}

impl MindRecord {
    pub fn from_session(session: &Session) -> Option<Self> {
        if !session.has_mind() {
            return None;
        }
        Some(Self {
            public_keys: session.public_keys().to_vec(),
            selected: session.selected_index().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the mind directory (~/.mind)
    pub mind_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the imported public keys
    pub keys_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the mind directory path (custom or default ~/.mind)
    pub fn mind_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new mind state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let mind_dir = Self::mind_dir(custom_path)?;
        if mind_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }
        fs::create_dir_all(&mind_dir)?;

        let config = config.unwrap_or_default();
        let config_path = mind_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            keys_path: mind_dir.join(KEYS_FILE_NAME),
            mind_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the mind directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let mind_dir = Self::mind_dir(custom_path)?;
        if !mind_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = mind_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            keys_path: mind_dir.join(KEYS_FILE_NAME),
            mind_dir,
            config_path,
            config,
        })
    }

    /// Read the imported mind, if there is one
    pub fn load_mind(&self) -> Result<Option<MindRecord>, StateError> {
        if !self.keys_path.exists() {
            return Ok(None);
        }
        let keys_toml = fs::read_to_string(&self.keys_path)?;
        let record: MindRecord = toml::from_str(&keys_toml)?;
        Ok(Some(record))
    }

    pub fn save_mind(&self, record: &MindRecord) -> Result<(), StateError> {
        let keys_toml = toml::to_string_pretty(record)?;
        fs::write(&self.keys_path, keys_toml)?;
        Ok(())
    }

    /// Remove the imported mind. Returns whether one was stored
    pub fn clear_mind(&self) -> Result<bool, StateError> {
        if !self.keys_path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.keys_path)?;
        Ok(true)
    }

    /// Rebuild a session from config and the stored mind
    pub fn session(&self) -> Result<Session, StateError> {
        let config = self.config.session_config();
        let Some(record) = self.load_mind()? else {
            return Ok(Session::new(config));
        };

        let mut session = Session::with_public_keys(config, record.public_keys);
        session
            .select_key(record.selected)
            .map_err(|e| StateError::InvalidKeys(e.to_string()))?;
        Ok(session)
    }

    /// Persist the public half of a session
    pub fn store_session(&self, session: &Session) -> Result<(), StateError> {
        match MindRecord::from_session(session) {
            Some(record) => self.save_mind(&record),
            None => self.clear_mind().map(|_| ()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("mind directory not initialized. Run 'mind init' first")]
    NotInitialized,

    #[error("mind directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid keys file: {0}")]
    InvalidKeys(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
