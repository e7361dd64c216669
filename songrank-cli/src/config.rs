/// Config file loading and creation for the songrank CLI.
///
/// Config lives at ~/.config/songrank/config.toml.
/// All fields are optional — CLI args override config values.
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct SongrankConfig {
    pub draft_path: Option<String>,
    pub randomize_sides: Option<bool>,
    pub seed: Option<u64>,
    pub json: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# songrank configuration
# All values here can be overridden by CLI flags.

# Where `songrank rank` saves a draft when you quit mid-session
# draft_path = \"/home/me/.local/share/songrank/draft.json\"

# Show the new song on a random side of each comparison (offsets
# positional bias). Set to false to always show it first.
# randomize_sides = true

# Seed for the side shuffle, for reproducible sessions
# seed = 42

# Print results as JSON instead of a table
# json = false
";

/// Default draft file when neither `--draft` nor `draft_path` is set.
pub const DEFAULT_DRAFT_FILE: &str = "songrank-draft.json";

/// Returns the default config path: ~/.config/songrank/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("songrank").join("config.toml"))
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<SongrankConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SongrankConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config at {}", path.display())),
    }
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
