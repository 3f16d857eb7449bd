use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::record::NamingRules;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Field separator of the snapshot files.
    pub separator: String,
    /// Directory the generated action script is written to.
    pub output_dir: PathBuf,
    /// File name prefix of the generated action script.
    pub output_prefix: String,
    pub naming: NamingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub rewrites: Vec<NameRewrite>,
    pub collapse_subfolders: Vec<String>,
}

/// Replaces every occurrence of `from` with `to` when deriving canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRewrite {
    pub from: String,
    pub to: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            separator: "|".to_string(),
            output_dir: std::env::temp_dir(),
            output_prefix: "action-commands-".to_string(),
            naming: NamingConfig::default(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            rewrites: vec![NameRewrite {
                from: "_HEVC.MOV".to_string(),
                to: ".MP4".to_string(),
            }],
            collapse_subfolders: vec!["live".to_string()],
        }
    }
}

impl AppConfig {
    /// The separator as the single byte the snapshot reader splits on.
    pub fn separator_byte(&self) -> Result<u8, Error> {
        match self.separator.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(Error::InvalidSeparator(self.separator.clone())),
        }
    }

    pub fn naming_rules(&self) -> NamingRules {
        NamingRules::new(
            self.naming.rewrites.clone(),
            self.naming.collapse_subfolders.clone(),
        )
    }
}

/// Load configuration from `config_path` (required when given) or an optional
/// `Config.toml` in the working directory, then `RECONCILE_*` environment
/// variables.
pub fn load_configuration(config_path: Option<&Path>) -> Result<AppConfig, Error> {
    let file_source = match config_path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Config").required(false),
    };

    let builder = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("RECONCILE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(builder.try_deserialize::<AppConfig>()?)
}
