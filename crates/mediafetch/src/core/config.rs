//! Configuration loading and management.
//!
//! `FetchConfig` can be loaded from TOML, YAML, or JSON, discovered from a
//! `mediafetch.toml` in the working directory or its parents, or built in
//! code. Every field has a default, so partial files are fine.

use crate::core::mime::{TIFF_MIME_TYPE, same_type};
use crate::{MediaFetchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "mediafetch.toml";

/// Configuration for a single-item fetch.
///
/// # Example
///
/// ```rust
/// use mediafetch::FetchConfig;
///
/// let config = FetchConfig::default();
/// assert!(config.is_distrusted("image/tiff"));
/// assert!(!config.is_distrusted("image/jpeg"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Run the byte sniffer at all. When false the declared type is used as is.
    #[serde(default = "default_true")]
    pub sniff_enabled: bool,

    /// Sniffer results that are discarded as if the sniffer had no opinion.
    #[serde(default = "default_distrusted")]
    pub distrusted_sniffed_types: Vec<String>,

    /// Bytes handed to the sniffer from the start of the preview.
    #[serde(default = "default_sniff_header_bytes")]
    pub sniff_header_bytes: usize,

    /// Upper bound of the local preview copy.
    #[serde(default = "default_preview_size_bytes")]
    pub preview_size_bytes: u64,

    /// Directory for preview copies (None = system temp dir).
    #[serde(default)]
    pub preview_dir: Option<PathBuf>,

    /// Bytes read from the resource for dimension and EXIF probing.
    #[serde(default = "default_probe_max_bytes")]
    pub probe_max_bytes: u64,

    /// Probe raster images for dimensions during pre-catalog enrichment.
    #[serde(default = "default_true")]
    pub probe_dimensions: bool,
}

fn default_true() -> bool {
    true
}

fn default_distrusted() -> Vec<String> {
    vec![TIFF_MIME_TYPE.to_string()]
}

fn default_sniff_header_bytes() -> usize {
    8 * 1024
}

fn default_preview_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_probe_max_bytes() -> u64 {
    16 * 1024 * 1024
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            sniff_enabled: true,
            distrusted_sniffed_types: default_distrusted(),
            sniff_header_bytes: default_sniff_header_bytes(),
            preview_size_bytes: default_preview_size_bytes(),
            preview_dir: None,
            probe_max_bytes: default_probe_max_bytes(),
            probe_dimensions: true,
        }
    }
}

impl FetchConfig {
    /// Whether a sniffed type belongs to the distrusted set.
    pub fn is_distrusted(&self, sniffed: &str) -> bool {
        self.distrusted_sniffed_types
            .iter()
            .any(|distrusted| same_type(distrusted, sniffed))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `MediaFetchError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| MediaFetchError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| MediaFetchError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| MediaFetchError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load from a file, choosing the format by extension (TOML by default).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()).map(|s| s.to_lowercase()) {
            Some(ext) if ext == "yaml" || ext == "yml" => Self::from_yaml_file(path),
            Some(ext) if ext == "json" => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover `mediafetch.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(MediaFetchError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Loading discovered config");
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        MediaFetchError::validation_with_source(format!("Failed to read config file {}", path.display()), e)
    })
}
