// Configuration loading and parsing (kickoff.toml).

use kickoff_core::{DraftSettings, FormationCaps, MAX_JITTER_AMPLITUDE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CONFIG_FILE: &str = "kickoff.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("no defaults/ or config/ directory in {base_dir}; run kickoff from its crate directory")]
    MissingDefaults { base_dir: PathBuf },

    #[error("failed to seed {path} from defaults: {source}")]
    DefaultsCopyError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// kickoff.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub formation: FormationCaps,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub num_teams: usize,
    #[serde(default = "default_jitter")]
    pub jitter_amplitude: f64,
    /// Fixed RNG seed. `None` draws a fresh seed from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_jitter() -> f64 {
    kickoff_core::DEFAULT_JITTER_AMPLITUDE
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
}

impl Config {
    /// Settings for a first generation: configured shape, no jitter.
    pub fn draft_settings(&self) -> DraftSettings {
        DraftSettings {
            formation: self.formation,
            jitter_amplitude: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/kickoff.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` handles that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/kickoff.toml` from `defaults/kickoff.toml` if it is missing.
///
/// The shipped default is parsed before it is copied, so a broken default is
/// reported against its own path instead of surfacing later as a bad user
/// config. An existing `config/kickoff.toml` is never touched, and
/// `.example` files are never seeded. Returns the files that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let source = defaults_dir.join(CONFIG_FILE);
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(vec![]);
    }
    if !source.exists() {
        if config_dir.exists() {
            // load_config_from reports the missing file itself.
            return Ok(vec![]);
        }
        return Err(ConfigError::MissingDefaults {
            base_dir: base_dir.to_path_buf(),
        });
    }

    let text = read_file(&source)?;
    toml::from_str::<Config>(&text).map_err(|e| ConfigError::ParseError {
        path: source.clone(),
        source: e,
    })?;

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        path: target.clone(),
        source: e,
    };
    std::fs::create_dir_all(&config_dir).map_err(copy_err)?;
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, text.as_bytes()).map_err(copy_err)?;
            info!("seeded {} from {}", target.display(), source.display());
            Ok(vec![target.clone()])
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(vec![]),
        Err(e) => Err(copy_err(e)),
    }
}

/// Load config relative to the current working directory, seeding it from
/// `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.generator.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "generator.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    let jitter = config.generator.jitter_amplitude;
    if !jitter.is_finite() || !(0.0..=MAX_JITTER_AMPLITUDE).contains(&jitter) {
        return Err(ConfigError::ValidationError {
            field: "generator.jitter_amplitude".into(),
            message: format!("must be between 0 and {MAX_JITTER_AMPLITUDE} inclusive, got {jitter}"),
        });
    }

    let caps = &config.formation;
    let cap_fields: &[(&str, usize)] = &[
        ("formation.defenders", caps.defenders),
        ("formation.midfielders", caps.midfielders),
        ("formation.forwards", caps.forwards),
    ];
    for (name, val) in cap_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.data_paths.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.players".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
