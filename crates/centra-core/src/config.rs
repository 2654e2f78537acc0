use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::linalg::DEFAULT_TOLERANCE;

/// Default project config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "centra.toml";

/// Largest accepted PageRank iteration count.
pub const MAX_PAGERANK_ITERATIONS: usize = 1_000_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Preferred output mode (`pretty`, `text` or `json`).
    #[serde(default)]
    pub output: Option<String>,
    /// Dataset file used when `--data` is not given. A relative path is
    /// taken relative to the config file's directory.
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub pagerank: PageRankSettings,
    #[serde(default)]
    pub eigenvector: EigenvectorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankSettings {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Spread dangling-node rank over all nodes instead of dropping it.
    #[serde(default)]
    pub redistribute_dangling: bool,
}

impl Default for PageRankSettings {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            iterations: default_iterations(),
            redistribute_dangling: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorSettings {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap; unset means iterate until converged.
    #[serde(default)]
    pub max_iter: Option<usize>,
}

impl Default for EigenvectorSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iter: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
}

impl EffectiveConfig {
    /// Output preference from config files: project wins over user.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.project
            .output
            .as_deref()
            .or(self.user.output.as_deref())
    }
}

/// Load the project config.
///
/// With `explicit = Some(path)` the file must exist. Otherwise
/// `<project_root>/centra.toml` is read if present and defaults are used if
/// not.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or any file fails to
/// read, parse or validate.
pub fn load_project_config(project_root: &Path, explicit: Option<&Path>) -> Result<ProjectConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file {} does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = project_root.join(PROJECT_CONFIG_FILE);
            if !path.exists() {
                return Ok(ProjectConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    validate(&config).with_context(|| format!("Invalid settings in {}", path.display()))?;
    anchor_data_path(&mut config, &path);
    Ok(config)
}

/// Rebase a relative `data` path onto the directory holding `config_path`.
fn anchor_data_path(config: &mut ProjectConfig, config_path: &Path) {
    let Some(dir) = config_path.parent() else {
        return;
    };
    if let Some(data) = config.data.as_mut().filter(|data| data.is_relative()) {
        *data = dir.join(&*data);
    }
}

/// Load `<config_dir>/centra/config.toml`, defaulting when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("centra/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load project and user config together.
///
/// # Errors
///
/// Propagates errors from [`load_project_config`] and [`load_user_config`].
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<EffectiveConfig> {
    Ok(EffectiveConfig {
        project: load_project_config(project_root, explicit)?,
        user: load_user_config()?,
    })
}

fn validate(config: &ProjectConfig) -> Result<()> {
    let damping = config.pagerank.damping;
    if !(0.0..=1.0).contains(&damping) {
        bail!("pagerank.damping must be within [0, 1], got {damping}");
    }
    let iterations = config.pagerank.iterations;
    if iterations > MAX_PAGERANK_ITERATIONS {
        bail!("pagerank.iterations must be at most {MAX_PAGERANK_ITERATIONS}, got {iterations}");
    }
    let tolerance = config.eigenvector.tolerance;
    if tolerance.is_nan() || tolerance <= 0.0 {
        bail!("eigenvector.tolerance must be positive, got {tolerance}");
    }
    if config.eigenvector.max_iter == Some(0) {
        bail!("eigenvector.max_iter must be at least 1");
    }
    Ok(())
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_iterations() -> usize {
    100
}

const fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
