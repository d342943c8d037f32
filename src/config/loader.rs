//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Prefix for environment overrides: `APP__DATABASE__URL` sets `database.url`.
pub const ENV_PREFIX: &str = "APP__";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid override {var}: expected {prefix}<SECTION>__<KEY>", prefix = ENV_PREFIX)]
    Override { var: String },

    #[error("Invalid override {var}: expected {expected}")]
    OverrideValue { var: String, expected: &'static str },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply `APP__*` environment overrides and validate.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = load_with_overrides(&content, std::env::vars())?;

    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}

/// Parse and validate a TOML document without consulting the environment.
pub fn load_from_str(content: &str) -> Result<AppConfig, ConfigError> {
    load_with_overrides(content, std::iter::empty())
}

/// Parse a TOML document, apply the `APP__*` entries of `vars`, validate.
///
/// Variables without the prefix are ignored.
pub fn load_with_overrides<I>(content: &str, vars: I) -> Result<AppConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut table: toml::Table = toml::from_str(content)?;
    for (var, value) in vars {
        if let Some(path) = var.strip_prefix(ENV_PREFIX) {
            apply_override(&mut table, &var, path, &value)?;
        }
    }

    let config: AppConfig = toml::Value::Table(table).try_into()?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_override(
    table: &mut toml::Table,
    var: &str,
    path: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let mut parts = path.split("__");
    let (Some(section), Some(key), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ConfigError::Override { var: var.to_string() });
    };
    if section.is_empty() || key.is_empty() {
        return Err(ConfigError::Override { var: var.to_string() });
    }

    let section = section.to_ascii_lowercase();
    let key = key.to_ascii_lowercase();
    let like = default_value(&section, &key).or_else(|| {
        table
            .get(&section)
            .and_then(|s| s.get(&key))
            .cloned()
    });
    let value = coerce(var, value, like.as_ref())?;

    let section = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section) = section else {
        return Err(ConfigError::Override { var: var.to_string() });
    };
    section.insert(key, value);

    tracing::debug!(var = %var, "Applied configuration override");
    Ok(())
}

/// The built-in default for `section.key`, if the schema has one.
fn default_value(section: &str, key: &str) -> Option<toml::Value> {
    let defaults = toml::Value::try_from(AppConfig::default()).ok()?;
    defaults.get(section)?.get(key).cloned()
}

/// Environment values carry no type; parse them as the type of `like`.
///
/// Keys with nothing to compare against stay strings.
fn coerce(var: &str, raw: &str, like: Option<&toml::Value>) -> Result<toml::Value, ConfigError> {
    let invalid = |expected: &'static str| ConfigError::OverrideValue {
        var: var.to_string(),
        expected,
    };
    match like {
        Some(toml::Value::Boolean(_)) => raw
            .parse()
            .map(toml::Value::Boolean)
            .map_err(|_| invalid("true or false")),
        Some(toml::Value::Integer(_)) => raw
            .parse()
            .map(toml::Value::Integer)
            .map_err(|_| invalid("an integer")),
        Some(toml::Value::Float(_)) => raw
            .parse()
            .map(toml::Value::Float)
            .map_err(|_| invalid("a number")),
        _ => Ok(toml::Value::String(raw.to_string())),
    }
}
