use std::path::PathBuf;

use app_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Extractor class {class:?} derives from unknown class {base:?}")]
    UnknownBase { class: String, base: String },
    #[error("Inheritance cycle between extractor classes: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("Extractor class {class:?} derives from {base:?}, which is generated last")]
    DependsOnDeferred { class: String, base: String },
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Plugin directory and blocked plugin directory are both {0:?}")]
    SamePath(PathBuf),
    #[error("Both {plugins:?} and {blocked:?} exist, remove one of them")]
    Conflict { plugins: PathBuf, blocked: PathBuf },
    #[error("Failed to move {from:?} to {to:?}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to remove previous output {0:?}: {1}")]
    RemovePrevious(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Failed to read template {0:?}: {1}")]
    Template(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Failed to write {0:?}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
}
