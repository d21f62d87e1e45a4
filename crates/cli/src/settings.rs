// Config file location and loading.
// Default: ~/.config/tiershift/config.toml, overridable with --config or TIERSHIFT_CONFIG.

use std::path::{Path, PathBuf};

use tiershift_recon::TiershiftConfig;

use crate::exit_codes::{recon_exit_code, EXIT_IO};
use crate::CliError;

/// A parsed config plus the directory its relative paths resolve against.
pub struct LoadedConfig {
    pub config: TiershiftConfig,
    pub base_dir: PathBuf,
    /// File the config came from; `None` when built-in defaults are in use.
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.data_dir)
    }

    pub fn library_path(&self) -> PathBuf {
        self.data_dir().join(&self.config.library)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join(&self.config.history)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiershift")
        .join("config.toml")
}

/// Load the explicit config, or the default one if it exists, or defaults.
/// An explicit path that does not exist is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, CliError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path();
            if !p.exists() {
                log::debug!("no config at {}, using defaults", p.display());
                return Ok(LoadedConfig {
                    config: TiershiftConfig::default(),
                    base_dir: PathBuf::from("."),
                    source: None,
                });
            }
            p
        }
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read config {}: {e}", path.display())))?;
    let config = TiershiftConfig::from_toml(&text).map_err(|e| {
        CliError::new(recon_exit_code(&e), format!("{}: {e}", path.display()))
    })?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    log::debug!("loaded config {}", path.display());
    Ok(LoadedConfig {
        config,
        base_dir,
        source: Some(path),
    })
}
