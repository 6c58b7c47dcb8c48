use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::io::seed::{self, Seed};
use crate::model::config::BoardConfig;

/// Name of the config file picked up from the working directory
pub const CONFIG_FILE: &str = "taskboard.toml";

/// Error type for loading config and seed files
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse taskboard.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not parse seed file: {0}")]
    SeedParseError(#[from] serde_json::Error),
}

/// Everything a command needs: config plus the seed data, read once.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: BoardConfig,
    pub seed: Seed,
}

/// Read the board config.
///
/// An explicit path must exist. Otherwise `taskboard.toml` in `dir` is used
/// when present, and defaults when not.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<BoardConfig, WorkspaceError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = dir.join(CONFIG_FILE);
            if !candidate.exists() {
                debug!("no {} found, using defaults", CONFIG_FILE);
                return Ok(BoardConfig::default());
            }
            candidate
        }
    };
    let text = fs::read_to_string(&path).map_err(|e| WorkspaceError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&text)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config and seed for one command.
pub fn load_workspace(
    config_path: Option<&Path>,
    seed_path: Option<&Path>,
    dir: &Path,
) -> Result<Workspace, WorkspaceError> {
    let config = load_config(config_path, dir)?;
    let seed = match seed_path {
        Some(p) => seed::load_seed(p)?,
        None => Seed::default(),
    };
    Ok(Workspace { config, seed })
}
