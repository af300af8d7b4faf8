//! Configuration for calamity.toml
//!
//! Every section is optional; missing fields fall back to the values that
//! match a standard Age of Calamity dump and a Cethleann install next to
//! the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "calamity.toml";

fn default_title_prefix() -> String {
    "01002B00111A".to_string()
}

fn default_base_id() -> String {
    "01002B00111A2000".to_string()
}

fn default_romfs_dir() -> String {
    "romfs".to_string()
}

fn default_exporter() -> PathBuf {
    PathBuf::from("Cethleann").join("Cethleann.DataExporter.exe")
}

fn default_ktid_tool() -> PathBuf {
    PathBuf::from("Cethleann").join("Nyotengu.KTID.exe")
}

fn default_true() -> bool {
    true
}

fn default_merged_root() -> PathBuf {
    PathBuf::from("romfs")
}

fn default_export_root() -> PathBuf {
    PathBuf::from("extracted-rdb")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The full configuration (calamity.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Title identifiers used to find versioned install directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleConfig {
    /// Shared prefix of the base game, update and DLC title ids
    #[serde(default = "default_title_prefix")]
    pub prefix: String,
    /// Title id of the base game; its presence turns on merging
    #[serde(default = "default_base_id")]
    pub base_id: String,
    /// Subdirectory holding the filesystem root inside each title dir
    #[serde(default = "default_romfs_dir")]
    pub romfs_dir: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            prefix: default_title_prefix(),
            base_id: default_base_id(),
            romfs_dir: default_romfs_dir(),
        }
    }
}

/// External executables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// RDB archive exporter
    #[serde(default = "default_exporter")]
    pub exporter: PathBuf,
    /// KTID texture resolver, run once per hash list row
    #[serde(default = "default_ktid_tool")]
    pub ktid: PathBuf,
    /// Discard the tools' stdout/stderr
    #[serde(default = "default_true")]
    pub quiet: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            exporter: default_exporter(),
            ktid: default_ktid_tool(),
            quiet: true,
        }
    }
}

/// Working directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Destination of the install merge
    #[serde(default = "default_merged_root")]
    pub merged_root: PathBuf,
    /// Output of the archive exporter, input of the remap
    #[serde(default = "default_export_root")]
    pub export_root: PathBuf,
    /// Root of the remap bundles; the export root when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_root: Option<PathBuf>,
    /// Where `log-<timestamp>.txt` is written
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            merged_root: default_merged_root(),
            export_root: default_export_root(),
            output_root: None,
            log_dir: default_log_dir(),
        }
    }
}

impl PathsConfig {
    /// Root the remap writes bundles under
    pub fn output_root(&self) -> &Path {
        self.output_root.as_deref().unwrap_or(&self.export_root)
    }
}

/// Remap scheduling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Worker threads for the remap; 0 uses the rayon default
    #[serde(default)]
    pub threads: usize,
}

impl Config {
    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::path_io("failed to read", path, e))?;
        Self::from_toml(&content).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse config text
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find and load the config for this run.
    ///
    /// Looks for `./calamity.toml`, then the platform config directory
    /// (`<config dir>/Calamity/config.toml`). Falls back to defaults when
    /// neither exists.
    pub fn discover() -> Result<Self> {
        match Self::discover_path() {
            Some(path) => {
                tracing::info!("Using config {}", path.display());
                Self::load(path)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn discover_path() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|p| p.join("Calamity").join("config.toml"))
            .filter(|p| p.is_file())
    }
}
