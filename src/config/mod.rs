pub mod fields;

use std::{fs, io, path::Path};

use log::{debug, info};
use serde_json::{Map, Value};

use crate::error::{BuildError, Result};

pub use fields::{FieldDescriptor, Requirement, MANDATORY_FIELDS, OPTIONAL_FIELDS};

/// A model configuration document. Iteration order is insertion order.
pub type Config = Map<String, Value>;

/// Loads a previously saved config to use as defaults.
///
/// Returns an empty config when no path is given or the file does not exist.
///
/// # Errors
/// Returns `BuildError::Io` if the file exists but cannot be read, and
/// `BuildError::Json` if it is not a JSON object.
pub fn load_existing(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::new());
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no existing config at {}", path.display());
            return Ok(Config::new());
        }
        Err(source) => {
            return Err(BuildError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: Config = serde_json::from_str(&content).map_err(|source| BuildError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!("loaded {} entries from {}", config.len(), path.display());
    Ok(config)
}

/// Overlays `scraped` onto `existing`. Scraped values win on collision and
/// keep the existing key's position; new keys are appended.
pub fn merge(existing: &Config, scraped: &Config) -> Config {
    let mut merged = existing.clone();
    for (key, value) in scraped {
        merged.insert(key.clone(), value.clone());
    }
    debug!(
        "merged {} existing and {} scraped entries into {}",
        existing.len(),
        scraped.len(),
        merged.len()
    );
    merged
}

/// Renders a value the way it is echoed to the operator: strings bare,
/// `null` as `None`, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
