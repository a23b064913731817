//! `reflgraph.toml` settings. Command-line flags override every field.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use reflgraph_core::palette::palette;
use reflgraph_core::{Policy, RankDir, Splines};
use reflgraph_dot::OutputFormat;
use reflgraph_error::{Error, Result};

/// File looked up in the working directory when no config is given.
pub const CONFIG_FILE_NAME: &str = "reflgraph.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub format: String,
    pub rankdir: String,
    pub splines: String,
    pub dot_binary: PathBuf,
    /// Directory for default output names such as `map.gv`.
    pub output_dir: PathBuf,
    /// Recoloring policy for object maps; unset keeps the fixed block colors.
    pub recolor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::default().to_string(),
            rankdir: RankDir::default().to_string(),
            splines: Splines::default().to_string(),
            dot_binary: PathBuf::from("dot"),
            output_dir: PathBuf::from("."),
            recolor: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source).map_err(|err| {
            Error::config_invalid(err.message().to_string())
                .with_operation("config::from_toml_str")
                .set_source(err)
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(
                Error::file_not_found(path.display().to_string()).with_operation("config::load")
            );
        }
        let source = fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))?;
        let config = Self::from_toml_str(&source)
            .map_err(|err| err.with_context("path", path.display().to_string()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The explicit file when given, otherwise `reflgraph.toml` in `dir` if
    /// present, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::load(candidate);
        }
        Ok(Self::default())
    }

    /// Reject values the typed accessors cannot parse.
    pub fn validate(&self) -> Result<()> {
        self.output_format()?;
        self.rank_dir()?;
        self.splines()?;
        self.recolor_policy()?;
        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::parse(&self.format).map_err(|err| {
            Error::config_invalid(format!("unknown format '{}'", self.format)).set_source(err)
        })
    }

    pub fn rank_dir(&self) -> Result<RankDir> {
        self.rankdir.parse().map_err(|_| {
            Error::config_invalid(format!("unknown rank direction '{}'", self.rankdir))
                .with_context("field", "rankdir")
        })
    }

    pub fn splines(&self) -> Result<Splines> {
        self.splines.parse().map_err(|_| {
            Error::config_invalid(format!("unknown splines '{}'", self.splines))
                .with_context("field", "splines")
        })
    }

    pub fn recolor_policy(&self) -> Result<Option<Policy>> {
        let Some(name) = &self.recolor else {
            return Ok(None);
        };
        let Ok(policy) = name.parse::<Policy>();
        let unknown = match &policy {
            Policy::Single(palette_name) => palette(palette_name).is_none(),
            Policy::Rotate | Policy::Order => false,
        };
        if unknown {
            return Err(Error::config_invalid(format!("unknown palette '{name}'"))
                .with_context("field", "recolor"));
        }
        Ok(Some(policy))
    }
}
