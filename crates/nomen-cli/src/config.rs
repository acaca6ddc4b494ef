use anyhow::{Context, Result, bail};
use nomen_lookup::InvocationFilter;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "nomen.json";

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles cases where nomen.json contains `"json": "true"` instead of `"json": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                s
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NomenConfig {
    /// Model path, relative to the config file.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub lookup: LookupSection,
    #[serde(default)]
    pub context: ContextSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LookupSection {
    #[serde(default)]
    pub invocation_filter: Option<String>,
    #[serde(default)]
    pub root_type: Option<String>,
    /// Default for `--invoke`.
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub invocation: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContextSection {
    #[serde(default)]
    pub current_type: Option<String>,
    #[serde(default)]
    pub current_module: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutputSection {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub json: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub pretty: Option<bool>,
}

pub fn parse_config(source: &str) -> Result<NomenConfig> {
    serde_json::from_str(source).context("failed to parse nomen.json")
}

pub fn load_config(path: &Path) -> Result<NomenConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Locate the config file: an explicit `--project` (file or directory), or
/// `nomen.json` in the working directory when present.
pub fn find_config(project: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    let Some(project) = project else {
        let candidate = cwd.join(CONFIG_FILE_NAME);
        return Ok(candidate.is_file().then_some(candidate));
    };

    let project = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };
    let path = if project.is_dir() {
        project.join(CONFIG_FILE_NAME)
    } else {
        project
    };
    if !path.is_file() {
        bail!("config file not found: {}", path.display());
    }
    Ok(Some(path))
}

/// Flags and config merged; flags win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model: PathBuf,
    pub invocation_filter: InvocationFilter,
    pub root_type: Option<String>,
    pub current_type: Option<String>,
    pub current_module: Option<String>,
    pub invocation: bool,
    pub json: bool,
    pub pretty: Option<bool>,
}

pub fn resolve_settings(
    args: &CliArgs,
    config: Option<&NomenConfig>,
    config_dir: &Path,
    cwd: &Path,
) -> Result<Settings> {
    let default = NomenConfig::default();
    let config = config.unwrap_or(&default);

    let model = match (&args.model, &config.model) {
        (Some(path), _) => cwd.join(path),
        (None, Some(path)) => config_dir.join(path),
        (None, None) => bail!("no model given: pass --model or set `model` in {CONFIG_FILE_NAME}"),
    };

    let invocation_filter = match (args.invocation_filter, &config.lookup.invocation_filter) {
        (Some(flag), _) => flag.into(),
        (None, Some(name)) => name
            .parse::<InvocationFilter>()
            .map_err(anyhow::Error::msg)
            .context("invalid lookup.invocationFilter")?,
        (None, None) => InvocationFilter::default(),
    };

    Ok(Settings {
        model,
        invocation_filter,
        root_type: args
            .root_type
            .clone()
            .or_else(|| config.lookup.root_type.clone()),
        current_type: args
            .current_type
            .clone()
            .or_else(|| config.context.current_type.clone()),
        current_module: args
            .current_module
            .clone()
            .or_else(|| config.context.current_module.clone()),
        invocation: args.invoke || config.lookup.invocation.unwrap_or(false),
        json: args.json || config.output.json.unwrap_or(false),
        pretty: args.pretty.or(config.output.pretty),
    })
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
