//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// AspectLens - aspect distribution charts for classified reviews
///
/// Upload a reviews text file (or a microphone recording) to an aspect
/// classification service and chart the returned category distribution.
///
/// Examples:
///   aspectlens reviews.txt
///   aspectlens reviews.txt --format markdown --output report.md
///   aspectlens --record --max-record-secs 15
///   aspectlens predictions.txt --labels-file
///   aspectlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Reviews text file to upload for classification
    ///
    /// One review per line, plain text. Not required when using
    /// --record or --init-config.
    #[arg(value_name = "FILE", required_unless_present_any = ["record", "init_config"])]
    pub input: Option<PathBuf>,

    /// Base URL of the classification service
    ///
    /// Defaults to http://127.0.0.1:5000. Can also be set via the
    /// ASPECTLENS_SERVER env var or .aspectlens.toml; an explicit flag
    /// or env value overrides the config file.
    #[arg(short, long, env = "ASPECTLENS_SERVER", value_name = "URL")]
    pub server: Option<String>,

    /// Record audio from the microphone instead of uploading a file
    ///
    /// The clip is sent to the audio endpoint for server-side
    /// transcription and classification.
    #[arg(short, long, conflicts_with = "input")]
    pub record: bool,

    /// Treat the input file as an already-predicted label stream
    ///
    /// Skips the network entirely and charts the file's lines directly.
    #[arg(long, requires = "input")]
    pub labels_file: bool,

    /// Write the report to this file instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .aspectlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum recording length in seconds
    ///
    /// Recording also stops early when Enter is pressed.
    #[arg(long, value_name = "SECS", requires = "record")]
    pub max_record_secs: Option<u64>,

    /// Input device name for recording
    ///
    /// Uses the system default input device if not specified.
    #[arg(long, value_name = "NAME", requires = "record")]
    pub device: Option<String>,

    /// Also save the recorded clip as a WAV file
    #[arg(long, value_name = "FILE", requires = "record")]
    pub keep_audio: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .aspectlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Terminal bar chart (default)
    #[default]
    Text,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate server URL format (not needed for local label files)
        if !self.labels_file {
            if let Some(ref server) = self.server {
                if !server.starts_with("http://") && !server.starts_with("https://") {
                    return Err("Server URL must start with 'http://' or 'https://'".to_string());
                }
            }
        }

        // Validate the input file if provided
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Input path is not a file: {}", input.display()));
            }
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate recording length if provided
        if let Some(max_secs) = self.max_record_secs {
            if max_secs == 0 {
                return Err("Recording length must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            server: None,
            record: true,
            labels_file: false,
            output: None,
            format: OutputFormat::Text,
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
    fn test_validation_ok() {
        let args = make_args();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.server = Some("127.0.0.1:5000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_absent_url_ok() {
        // No flag or env value: the config file or default applies
        let args = make_args();
        assert!(args.server.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.record = false;
        args.input = Some(PathBuf::from("no/such/reviews.txt"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
