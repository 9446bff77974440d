use std::path::PathBuf;

use thiserror::Error;

use crate::class::RootBase;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read {0:?}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse manifest {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to list plugins in {0:?}: {1}")]
    PluginDir(PathBuf, #[source] std::io::Error),
    #[error("Extractor class {0:?} is registered more than once")]
    DuplicateClass(String),
    #[error("Extractor class {0:?} has no base classes")]
    MissingBases(String),
    #[error("Extractor class {0:?} has no module")]
    MissingModule(String),
    #[error("Extractor class name {0:?} is reserved")]
    ReservedName(String),
    #[error("{member:?} is not an allowed shared member of {root}")]
    UnlistedRootMember { root: RootBase, member: String },
}
