// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for dormwatch.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, job-specific settings resolution, and miette diagnostics with
//! typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use dormwatch_config::{load_and_validate, ElecSettings};
//!
//! let config = load_and_validate(None).expect("config errors");
//! let settings = ElecSettings::from_config(&config).expect("missing values");
//! println!("rooms: {}", settings.rooms.len());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod settings;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DormwatchConfig, RoomConfig};
pub use settings::{ElecSettings, RollcallSettings};

/// Load configuration and validate it.
///
/// With `path`, only that file (plus the environment) is read; otherwise the
/// XDG hierarchy is used. Figment errors are converted to diagnostics with
/// source spans taken from the files that were read.
pub fn load_and_validate(path: Option<&Path>) -> Result<DormwatchConfig, Vec<ConfigError>> {
    let loaded = match path {
        Some(path) => loader::load_config_from_path(path),
        None => loader::load_config(),
    };
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = collect_toml_sources(path);
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<DormwatchConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources(explicit: Option<&Path>) -> Vec<(String, String)> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut paths = vec![std::path::PathBuf::from("/etc/dormwatch/dormwatch.toml")];
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("dormwatch/dormwatch.toml"));
            }
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd.join("dormwatch.toml"));
            }
            paths
        }
    };

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
