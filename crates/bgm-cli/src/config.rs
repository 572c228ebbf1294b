use bgm_bbcode_parser::ParseOptions;
use bgm_bbcode_render::PlainTextOptions;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

/// Errors when loading config.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// Failed to read config file.
    ///
    /// * 0: file path.
    /// * 1: io error.
    #[error("failed to read config file {0}")]
    Read(String, #[source] std::io::Error),

    /// Config content is not valid toml or has incorrect fields.
    ///
    /// * 0: file path.
    /// * 1: deserialize error.
    #[error("invalid config in {0}")]
    Invalid(String, #[source] toml::de::Error),
}

/// Config definition for parsing and rendering.
///
/// ```toml
/// [parse]
/// normalize = true
/// smilies = true
///
/// [render]
/// bullet = "- "
/// indent = 4
/// reveal_masks = false
/// mask_char = "*"
/// show_links = true
/// ```
///
/// All sections and fields are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Steps to run after parsing.
    pub(crate) parse: ParseOptions,

    /// Options of plain text rendering.
    pub(crate) render: PlainTextOptions,
}

impl Config {
    /// Load config from file at `path`, use default config when `path` is `None`.
    pub(crate) async fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read(path.to_string(), e))?;
        let config = Self::from_toml(path, &content)?;
        debug!("loaded config from {path}: {config:?}");
        Ok(config)
    }

    fn from_toml(path: &str, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(path.to_string(), e))
    }
}
