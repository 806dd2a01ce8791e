//! Configuration loading for CureCancAI.
//! Reads curecanc.toml (or a YAML file) from the current directory or the path
//! in the CURECANC_CONFIG env var. Every section has defaults, so an empty
//! file and a missing default file are both valid.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use curecanc_common::{CureError, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "CURECANC_CONFIG";
pub const BIND_ENV: &str = "CURECANC_BIND";
pub const MODEL_DIR_ENV: &str = "CURECANC_MODEL_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "curecanc.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub chatbot: ChatbotConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_bind()       -> String  { "127.0.0.1:8501".to_string() }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), static_dir: default_static_dir() }
    }
}

/// Locations of the three serialized model artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
    #[serde(default = "default_feature_names_path")]
    pub feature_names_path: PathBuf,
}

fn default_classifier_path()    -> PathBuf { PathBuf::from("model/model.json") }
fn default_scaler_path()        -> PathBuf { PathBuf::from("model/scaler.json") }
fn default_feature_names_path() -> PathBuf { PathBuf::from("model/feature_names.json") }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            classifier_path: default_classifier_path(),
            scaler_path: default_scaler_path(),
            feature_names_path: default_feature_names_path(),
        }
    }
}

impl ModelConfig {
    /// Keep each artifact's file name but move it under `dir`.
    pub fn rebase(&mut self, dir: &Path) {
        for path in [&mut self.classifier_path, &mut self.scaler_path, &mut self.feature_names_path] {
            if let Some(name) = path.file_name() {
                *path = dir.join(name);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_download_filename")]
    pub download_filename: String,
}

fn default_download_filename() -> String { "breast_cancer_report.pdf".to_string() }

impl Default for ReportConfig {
    fn default() -> Self {
        Self { download_filename: default_download_filename() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatbotConfig {
    #[serde(default = "default_iframe_url")]
    pub iframe_url: String,
    #[serde(default = "default_iframe_height")]
    pub height: u32,
}

fn default_iframe_url()    -> String { "https://www.chatbase.co/chatbot-iframe/kphq_g1RlH3TcsGvwEJvD".to_string() }
fn default_iframe_height() -> u32    { 600 }

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self { iframe_url: default_iframe_url(), height: default_iframe_height() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Live sessions kept before the oldest is evicted.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_cookie_name()  -> String { "curecanc_session".to_string() }
fn default_max_sessions() -> usize  { 1024 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { cookie_name: default_cookie_name(), max_sessions: default_max_sessions() }
    }
}


impl Config {
    /// Load configuration.
    /// An explicit CURECANC_CONFIG path must exist; the default curecanc.toml is optional.
    /// Environment overrides are applied last, then the result is validated.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => {
                tracing::debug!("{} not found, using built-in defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file; `.yaml`/`.yml` are read as YAML, everything else as TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CureError::Config(format!(
                "Config file not found: {}\nCopy curecanc.example.toml to curecanc.toml and edit it.",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CureError::Config(format!("invalid TOML: {e}")))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CureError::Config(format!("invalid YAML: {e}")))
    }

    /// Apply CURECANC_BIND and CURECANC_MODEL_DIR overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.bind = bind;
        }
        if let Some(dir) = lookup(MODEL_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.model.rebase(Path::new(&dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        let paths = [
            ("model.classifier_path", &self.model.classifier_path),
            ("model.scaler_path", &self.model.scaler_path),
            ("model.feature_names_path", &self.model.feature_names_path),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(CureError::Config(format!("{key} must not be empty")));
            }
        }
        if self.report.download_filename.trim().is_empty() {
            return Err(CureError::Config("report.download_filename must not be empty".into()));
        }
        if self.chatbot.height == 0 {
            return Err(CureError::Config("chatbot.height must be greater than zero".into()));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(CureError::Config("session.cookie_name must not be empty".into()));
        }
        if self.session.max_sessions == 0 {
            return Err(CureError::Config("session.max_sessions must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            CureError::Config(format!("server.bind {:?} is not a socket address: {e}", self.server.bind))
        })
    }
}
