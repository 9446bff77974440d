use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::{common, generator};

/// Regenerate the lazy extractor module: lightweight stand-ins for every
/// built-in extractor, ordered so bases come before the classes using them.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(disable_help_flag = true)]
#[command(name = "make-lazy-extractors", version)]
pub struct CliArgs {
    /// Print help
    #[clap(action = ArgAction::Help, long)]
    help: Option<bool>,

    #[command(flatten)]
    pub generator: generator::GeneratorConfig,

    #[command(flatten)]
    pub run: common::RunConfig,
}
