use std::path::PathBuf;

use clap::{Args, ValueHint};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validators::path::{same_location, validate_is_not_directory, validate_is_not_empty};

pub const DEFAULT_OUTPUT: &str = "yt_dlp/extractor/lazy_extractors.py";
pub const DEFAULT_TEMPLATE: &str = "devscripts/lazy_load_template.py";
pub const DEFAULT_REGISTRY: &str = "devscripts/extractors.toml";
pub const DEFAULT_PLUGINS_DIR: &str = "ytdlp_plugins";
pub const DEFAULT_BLOCKED_PLUGINS_DIR: &str = "ytdlp_plugins_blocked";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Args, Validate)]
#[validate(schema(function = "validate_plugin_dirs"))]
#[clap(next_help_heading = Some("Generator options"))]
pub struct GeneratorConfig {
    /// Where to write the generated lazy extractor module
    #[arg(default_value = DEFAULT_OUTPUT, value_name = "OUTPUT", value_hint = ValueHint::FilePath)]
    #[validate(custom(function = "validate_is_not_directory"))]
    pub output: PathBuf,

    /// Source prepended verbatim to the generated module
    #[arg(long, default_value = DEFAULT_TEMPLATE, env = "LAZY_EXTRACTORS_TEMPLATE", value_hint = ValueHint::FilePath)]
    #[validate(custom(function = "validate_is_not_empty"))]
    pub template: PathBuf,

    /// Class table describing the built-in extractors
    #[arg(long, default_value = DEFAULT_REGISTRY, env = "LAZY_EXTRACTORS_REGISTRY", value_hint = ValueHint::FilePath)]
    #[validate(custom(function = "validate_is_not_empty"))]
    pub registry: PathBuf,

    /// Plugin directory kept out of sight while the class table is loaded
    #[arg(long, default_value = DEFAULT_PLUGINS_DIR, value_hint = ValueHint::DirPath)]
    #[validate(custom(function = "validate_is_not_empty"))]
    pub plugins_dir: PathBuf,

    /// Temporary name of the plugin directory during generation
    #[arg(long, default_value = DEFAULT_BLOCKED_PLUGINS_DIR, value_hint = ValueHint::DirPath)]
    #[validate(custom(function = "validate_is_not_empty"))]
    pub blocked_plugins_dir: PathBuf,
}
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.into(),
            template: DEFAULT_TEMPLATE.into(),
            registry: DEFAULT_REGISTRY.into(),
            plugins_dir: DEFAULT_PLUGINS_DIR.into(),
            blocked_plugins_dir: DEFAULT_BLOCKED_PLUGINS_DIR.into(),
        }
    }
}

fn validate_plugin_dirs(config: &GeneratorConfig) -> Result<(), ValidationError> {
    if same_location(&config.plugins_dir, &config.blocked_plugins_dir) {
        return Err(ValidationError::new(
            "Plugin directory and blocked plugin directory must differ",
        ));
    }

    Ok(())
}
