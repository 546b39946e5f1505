use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which syntax marks unescaped interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RawDelimiter {
    /// `{% expr %}`
    #[default]
    Percent,
    /// `{{{ expr }}}`
    TripleBrace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_directive_prefix")]
    pub directive_prefix: String,

    #[serde(default)]
    pub raw_delimiter: RawDelimiter,

    /// Attribute that marks elements carrying event bindings.
    #[serde(default = "default_event_attribute")]
    pub event_attribute: String,

    #[serde(default = "default_true")]
    pub strip_leading_blank_lines: bool,

    /// Fail on prefixed attributes that name no registered directive.
    #[serde(default)]
    pub strict_directives: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            directive_prefix: default_directive_prefix(),
            raw_delimiter: RawDelimiter::default(),
            event_attribute: default_event_attribute(),
            strip_leading_blank_lines: default_true(),
            strict_directives: false,
        }
    }
}

impl TemplateConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        from_file(path)
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        from_str(s)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(s)?)
}

fn default_directive_prefix() -> String {
    ":".to_string()
}
fn default_event_attribute() -> String {
    "data-view-event".to_string()
}
fn default_true() -> bool {
    true
}
