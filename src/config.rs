//! Run configuration, from command-line flags or `INPUT_*` environment
//! variables so the binary drops into a CI step unchanged.

use crate::error::{Error, Result};
use clap::{Parser, ValueEnum};

/// What kind of update a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Update scalars addressed by dot paths
    Key,
    /// Update image tags wherever an image mapping matches
    Image,
}

/// How results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary with diffs
    Text,
    /// One JSON object with all changes
    Json,
}

/// Configuration for one run.
#[derive(Debug, Clone, Parser)]
#[command(name = "yaml-bump", version, about = "Update YAML files in place, preserving formatting")]
pub struct Config {
    /// YAML files to update
    #[arg(long = "file", env = "INPUT_FILES", required = true)]
    pub files: Vec<String>,

    /// Update mode
    #[arg(long, env = "INPUT_MODE", value_enum, default_value = "key")]
    pub mode: Mode,

    /// Dot paths to update, paired with --value by position
    #[arg(long = "key", env = "INPUT_KEYS")]
    pub keys: Vec<String>,

    /// New values, paired with --key by position
    #[arg(long = "value", env = "INPUT_VALUES")]
    pub values: Vec<String>,

    /// Image name to match in image mode
    #[arg(long, env = "INPUT_IMAGE_NAME")]
    pub image_name: Option<String>,

    /// New image tag in image mode
    #[arg(long, env = "INPUT_IMAGE_TAG")]
    pub image_tag: Option<String>,

    /// Report changes without writing files
    #[arg(long, env = "INPUT_DRY_RUN")]
    pub dry_run: bool,

    /// Output format
    #[arg(long, env = "INPUT_OUTPUT", value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Splits newline-separated list items, trimming each and dropping blanks.
/// Composite-action env vars carry multi-line lists this way.
fn split_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.split('\n'))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Expand newline-separated list inputs into individual items.
    pub fn normalize(mut self) -> Self {
        self.files = split_list(&self.files);
        self.keys = split_list(&self.keys);
        self.values = split_list(&self.values);
        self
    }

    /// Check cross-flag consistency that clap cannot express.
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            Mode::Key => {
                if self.keys.is_empty() {
                    return Err(Error::Config(
                        "key mode requires at least one --key".to_string(),
                    ));
                }
                if self.keys.len() != self.values.len() {
                    return Err(Error::Config(format!(
                        "got {} keys but {} values",
                        self.keys.len(),
                        self.values.len()
                    )));
                }
            }
            Mode::Image => {
                if self.image_name.is_none() {
                    return Err(Error::Config(
                        "image mode requires --image-name".to_string(),
                    ));
                }
                if self.image_tag.is_none() {
                    return Err(Error::Config("image mode requires --image-tag".to_string()));
                }
            }
        }
        Ok(())
    }

    /// The key updates of a key-mode run, paired by position.
    pub fn updates(&self) -> Vec<(String, String)> {
        self.keys
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}
