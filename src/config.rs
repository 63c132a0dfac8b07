//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.aspectlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Classifier server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Audio recording settings.
    #[serde(default)]
    pub audio: AudioConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path for written reports.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "aspect_report.md".to_string()
}

/// Classifier server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the classification service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path for text file uploads.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Path for audio uploads (combined transcribe-and-classify).
    #[serde(default = "default_audio_path")]
    pub audio_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            audio_path: default_audio_path(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_upload_path() -> String {
    "/upload".to_string()
}

fn default_audio_path() -> String {
    "/upload_audio".to_string()
}

fn default_timeout() -> u64 {
    120 // classification of larger files can take a while
}

/// Audio recording settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Input device name. None uses the system default.
    #[serde(default)]
    pub device: Option<String>,

    /// Maximum recording length in seconds.
    #[serde(default = "default_max_record_seconds")]
    pub max_record_seconds: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            max_record_seconds: default_max_record_seconds(),
        }
    }
}

fn default_max_record_seconds() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".aspectlens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Optional settings - only override if provided
        if let Some(ref server) = args.server {
            self.server.base_url = server.clone();
        }
        if let Some(timeout) = args.timeout {
            self.server.timeout_seconds = timeout;
        }
        if let Some(max_secs) = args.max_record_secs {
            self.audio.max_record_seconds = max_secs;
        }
        if let Some(ref device) = args.device {
            self.audio.device = Some(device.clone());
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.server.upload_path, "/upload");
        assert_eq!(config.server.audio_path, "/upload_audio");
        assert_eq!(config.audio.max_record_seconds, 60);
    }

    fn make_args() -> crate::cli::Args {
        crate::cli::Args {
            input: None,
            server: None,
            record: true,
            labels_file: false,
            output: None,
            format: crate::cli::OutputFormat::Text,
            config: None,
            timeout: None,
            max_record_secs: None,
            device: None,
            keep_audio: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"

[server]
base_url = "http://classifier.internal:8080"
timeout_seconds = 30

[audio]
device = "USB Microphone"
max_record_seconds = 15
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert_eq!(config.server.base_url, "http://classifier.internal:8080");
        assert_eq!(config.server.timeout_seconds, 30);
        assert_eq!(config.audio.device.as_deref(), Some("USB Microphone"));
        assert_eq!(config.audio.max_record_seconds, 15);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[server]\ntimeout_seconds = 10\n").unwrap();
        assert_eq!(config.server.timeout_seconds, 10);
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.general.output, "aspect_report.md");
    }

    #[test]
    fn test_merge_keeps_config_base_url() {
        // A base_url from the config file must survive a merge with
        // arguments that never mention the server
        let mut config: Config =
            toml::from_str("[server]\nbase_url = \"http://classifier.internal:8080\"\n").unwrap();
        config.merge_with_args(&make_args());
        assert_eq!(config.server.base_url, "http://classifier.internal:8080");
    }

    #[test]
    fn test_merge_cli_overrides_config() {
        let mut config: Config =
            toml::from_str("[server]\nbase_url = \"http://classifier.internal:8080\"\n").unwrap();

        let mut args = make_args();
        args.server = Some("http://10.0.0.7:9000".to_string());
        args.timeout = Some(5);
        config.merge_with_args(&args);

        assert_eq!(config.server.base_url, "http://10.0.0.7:9000");
        assert_eq!(config.server.timeout_seconds, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".aspectlens.toml");
        std::fs::write(&path, "[audio]\nmax_record_seconds = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.audio.max_record_seconds, 5);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[audio]"));
    }
}
