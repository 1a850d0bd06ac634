/// Config file loading and creation for the qualsort CLI.
///
/// Config lives at ~/.config/qualsort/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct QualsortConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub elimination_count: Option<usize>,
    pub comparison_rounds: Option<usize>,
    pub concurrency: Option<usize>,
    pub cache_dir: Option<String>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# qualsort configuration
# All values here can be overridden by CLI flags.

# OpenAI-compatible API endpoint
# endpoint = \"http://localhost:8000\"

# Model ID
# model = \"Qwen/Qwen3-4B-Instruct-2507\"

# API key: use OPENAI_API_KEY env var or --api-key flag (not stored in config)

# Losses before a participant is eliminated
# elimination_count = 2

# Comparison rounds per match (even values balance order exposure)
# comparison_rounds = 2

# Max concurrent LLM requests
# concurrency = 10

# Directory for the persistent comparison cache.
# If not set, comparisons are cached in memory for the run only.
# cache_dir = \"~/.cache/qualsort\"
";

/// Returns the default config path: ~/.config/qualsort/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("qualsort").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> QualsortConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content)
                .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => QualsortConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
