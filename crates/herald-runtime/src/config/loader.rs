//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables `herald.toml` / `config.toml`
//! - `yaml-config`: enables `herald.yaml` / `herald.yml`
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Main config file (`herald.toml`), or the file given to [`ConfigLoader::file`]
//! 3. Profile-specific config file next to it (`herald.{profile}.toml`)
//! 4. Environment variables (`HERALD_*`)
//!
//! # Environment Variable Mapping
//!
//! Variables use the `HERALD_` prefix with `__` as the nesting separator:
//!
//! - `HERALD_BOT__PREFIX=?` → `bot.prefix = "?"`
//! - `HERALD_ANTI_SPAM__MAX_HITS=3` → `anti_spam.max_hits = 3`
//! - `HERALD_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./deploy/herald.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::HeraldConfig;

const ENV_PREFIX: &str = "HERALD_";

type MergeFn = fn(Figment, &Path) -> Figment;

#[cfg(feature = "toml-config")]
fn merge_toml(figment: Figment, path: &Path) -> Figment {
    figment.merge(Toml::file(path))
}

#[cfg(feature = "yaml-config")]
fn merge_yaml(figment: Figment, path: &Path) -> Figment {
    figment.merge(Yaml::file(path))
}

/// Compiled-in formats: searched base names and how to merge them.
const FORMATS: &[(&[&str], MergeFn)] = &[
    #[cfg(feature = "toml-config")]
    (&["herald.toml", "config.toml"], merge_toml),
    #[cfg(feature = "yaml-config")]
    (&["herald.yaml", "herald.yml"], merge_yaml),
];

fn merge_fn_for(path: &Path) -> ConfigResult<MergeFn> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    FORMATS
        .iter()
        .find(|(names, _)| names.iter().any(|n| n.ends_with(&format!(".{ext}"))))
        .map(|(_, merge)| *merge)
        .ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))
}

/// `dir/stem.profile.ext` for `dir/stem.ext`.
fn profile_variant(path: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some(path.with_file_name(format!("{stem}.{profile}.{ext}")))
}

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `HERALD_PROFILE`, defaulting to [`Profile::Development`].
    pub fn from_env() -> Self {
        std::env::var("HERALD_PROFILE")
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layered configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            ..Default::default()
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search for config files.
    ///
    /// When no search path is given, the current directory and
    /// `<config dir>/herald` are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn load(self) -> ConfigResult<HeraldConfig> {
        let mut figment = Figment::from(Serialized::defaults(HeraldConfig::default()));

        let file = match &self.file {
            Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => Some((path.clone(), merge_fn_for(path)?)),
            None => self.find_file(),
        };

        match file {
            Some((path, merge)) => {
                info!(path = %path.display(), "Loading configuration file");
                figment = merge(figment, &path);
                if let Some(variant) = profile_variant(&path, &self.profile).filter(|p| p.exists()) {
                    debug!(path = %variant.display(), "Loading profile-specific config");
                    figment = merge(figment, &variant);
                }
            }
            None => warn!("No configuration file found, using defaults"),
        }

        let config: HeraldConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        debug!(
            profile = %self.profile,
            prefix = %config.bot.prefix,
            logging_level = %config.logging.level,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// First existing base file, trying formats in order, then search
    /// paths, then base names.
    fn find_file(&self) -> Option<(PathBuf, MergeFn)> {
        let search_dirs: Vec<PathBuf> = if self.search_paths.is_empty() {
            std::env::current_dir()
                .ok()
                .into_iter()
                .chain(dirs::config_dir().map(|d| d.join("herald")))
                .collect()
        } else {
            self.search_paths.clone()
        };

        FORMATS.iter().find_map(|(names, merge)| {
            search_dirs
                .iter()
                .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
                .find(|path| path.exists())
                .map(|path| (path, *merge))
        })
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<HeraldConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from one file, with environment overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<HeraldConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================
