use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    class::ExtractorClass,
    error::RegistryError,
    table::{ClassTable, RootMembers},
};

/// On-disk form of a class table.
///
/// ```toml
/// [[roots.info]]
/// name = "ie_key"
/// source = '''
/// @classmethod
/// def ie_key(cls):
///     return cls.__name__[:-2]
/// '''
///
/// [[extractor]]
/// name = "YoutubeIE"
/// bases = ["YoutubeBaseInfoExtractor"]
/// module = "yt_dlp.extractor.youtube"
/// valid_url = '...'
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub roots: RootMembers,
    #[serde(default, rename = "extractor")]
    pub extractors: Vec<ExtractorClass>,
}
impl Manifest {
    pub fn read(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Read(path.to_path_buf(), e))?;

        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, RegistryError> {
        toml::from_str(text).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_table(self) -> Result<ClassTable, RegistryError> {
        ClassTable::builder()
            .roots(self.roots)
            .register_all(self.extractors)
            .build()
    }
}

impl ClassTable {
    #[tracing::instrument(level = "debug")]
    pub fn from_manifest(path: &Path) -> Result<Self, RegistryError> {
        let table = Manifest::read(path)?.into_table()?;

        debug!(classes = table.len(), "Loaded class table");

        Ok(table)
    }

    pub fn from_manifest_str(text: &str) -> Result<Self, RegistryError> {
        Manifest::parse(text, &PathBuf::from("<inline>"))?.into_table()
    }
}
