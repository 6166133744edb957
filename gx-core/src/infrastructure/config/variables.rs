// gx-core/src/infrastructure/config/variables.rs
//
// Secrets live in uncommitted/config_variables.yml and are referenced from
// great_expectations.yml as `${name}`.

use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub type ConfigVariables = BTreeMap<String, Value>;

pub const CONFIG_VARIABLES_HEADER: &str = "\
# This config file supports variable substitution which enables: 1) keeping
# secrets out of source control & 2) environment-based configuration changes
# such as staging vs prod.
#
# When GE encounters substitution syntax (like `my_key: ${my_value}` or
# `my_key: $my_value`) in the great_expectations.yml config file, it will
# attempt to replace the value of `my_key` with the value from an environment
# variable `my_value` or a corresponding key read from this config file, which
# is defined through the `config_variables_file_path`. Environment variables
# take precedence over variables defined here.
#
# Substitution values defined here can be a simple (non-nested) value,
# nested value such as a dictionary, or an environment variable (i.e. ${ENV_VAR})
#
# https://docs.greatexpectations.io/en/latest/how_to_guides/configuring_data_contexts/how_to_use_a_yaml_file_or_environment_variables_to_populate_credentials.html

";

static VARIABLE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_-]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)"));

fn variable_pattern() -> Result<&'static Regex, InfrastructureError> {
    VARIABLE
        .as_ref()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))
}

#[instrument]
pub fn load_config_variables(path: &Path) -> Result<ConfigVariables, InfrastructureError> {
    if !path.is_file() {
        debug!("No config variables file");
        return Ok(ConfigVariables::new());
    }
    let content = fs::read_to_string(path)?;
    if content
        .lines()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'))
    {
        return Ok(ConfigVariables::new());
    }
    let value: Option<ConfigVariables> = serde_yaml::from_str(&content)?;
    Ok(value.unwrap_or_default())
}

/// Adds or replaces one top-level entry, keeping the others.
#[instrument(skip(value))]
pub fn save_config_variable(
    path: &Path,
    key: &str,
    value: Value,
) -> Result<(), InfrastructureError> {
    let mut variables = load_config_variables(path)?;
    variables.insert(key.to_string(), value);
    let body = serde_yaml::to_string(&variables)?;
    atomic_write(path, format!("{}{}", CONFIG_VARIABLES_HEADER, body))
}

/// Resolves `${name}` / `$name` references. The process environment wins over
/// the file. A string that is exactly one reference takes the referenced
/// value as-is, so a whole credentials mapping can be injected.
pub fn substitute(value: &Value, variables: &ConfigVariables) -> Result<Value, InfrastructureError> {
    match value {
        Value::String(s) => substitute_str(s, variables),
        Value::Sequence(items) => items
            .iter()
            .map(|item| substitute(item, variables))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (k, v) in map {
                out.insert(k.clone(), substitute(v, variables)?);
            }
            Ok(Value::Mapping(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_str(s: &str, variables: &ConfigVariables) -> Result<Value, InfrastructureError> {
    let pattern = variable_pattern()?;

    if let Some(caps) = pattern.captures(s) {
        if caps.get(0).map(|m| m.as_str()) == Some(s) {
            return lookup(name_of(&caps), variables);
        }
    }

    let mut missing = None;
    let replaced = pattern.replace_all(s, |caps: &Captures| {
        let name = name_of(caps);
        match lookup(name, variables) {
            Ok(Value::String(v)) => v,
            Ok(other) => serde_yaml::to_string(&other)
                .map(|v| v.trim_end().to_string())
                .unwrap_or_default(),
            Err(_) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });
    if let Some(name) = missing {
        return Err(unresolved(&name));
    }
    Ok(Value::String(replaced.into_owned()))
}

fn name_of<'a>(caps: &Captures<'a>) -> &'a str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

fn lookup(name: &str, variables: &ConfigVariables) -> Result<Value, InfrastructureError> {
    if let Ok(v) = std::env::var(name) {
        return Ok(Value::String(v));
    }
    variables.get(name).cloned().ok_or_else(|| unresolved(name))
}

fn unresolved(name: &str) -> InfrastructureError {
    InfrastructureError::ConfigError(format!(
        "Unable to find a match for config substitution variable: `{}`",
        name
    ))
}
