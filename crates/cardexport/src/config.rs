//! Export configuration.
//!
//! Values come from an optional JSON file and are overridden by the
//! command line.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Persistent export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialect tag.
    pub dialect: String,
    /// Output charset override.
    pub charset: Option<String>,
    /// Path to the output vCard file.
    pub output_path: PathBuf,
    /// Abort on the first handler failure.
    pub strict_errors: bool,
    /// Photo size limit in bytes.
    pub max_photo_bytes: Option<usize>,
    /// Enable debug logging.
    pub debug_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: "default".to_string(),
            charset: None,
            output_path: PathBuf::from("contacts.vcf"),
            strict_errors: true,
            max_photo_bytes: None,
            debug_mode: false,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cardexport")
            .join("config.json")
    }

    /// Loads the configuration file, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn merge(mut self, args: &Args) -> Self {
        if let Some(dialect) = &args.dialect {
            self.dialect.clone_from(dialect);
        }
        if let Some(charset) = &args.charset {
            self.charset = Some(charset.clone());
        }
        if let Some(output) = &args.output {
            self.output_path.clone_from(output);
        }
        if args.lenient {
            self.strict_errors = false;
        }
        if args.max_photo_bytes.is_some() {
            self.max_photo_bytes = args.max_photo_bytes;
        }
        self.debug_mode |= args.debug;
        self
    }
}
