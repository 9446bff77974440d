use std::path::{Path, PathBuf};

use app_logger::{debug, info};

use crate::{class::ExtractorClass, error::RegistryError, manifest::Manifest};

/// Sub-directory of the plugins directory holding extractor plugins.
pub const EXTRACTOR_PLUGIN_DIR: &str = "extractor";

/// Python package plugins are imported from by the real loader.
pub const PLUGIN_PACKAGE: &str = "ytdlp_plugins";

/// Discover extractor plugins declared in `<plugins_dir>/extractor/*.toml`.
///
/// Files are read in name order. A plugin without an explicit module is
/// attributed to `ytdlp_plugins.extractor.<file stem>`. A missing directory
/// means there are no plugins.
#[tracing::instrument(level = "debug")]
pub fn discover(plugins_dir: &Path) -> Result<Vec<ExtractorClass>, RegistryError> {
    let dir = plugins_dir.join(EXTRACTOR_PLUGIN_DIR);
    if !dir.is_dir() {
        debug!(?dir, "No plugin directory");
        return Ok(vec![]);
    }

    let mut files = std::fs::read_dir(&dir)
        .map_err(|e| RegistryError::PluginDir(dir.clone(), e))?
        .map(|entry| entry.map(|x| x.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
        .map_err(|e| RegistryError::PluginDir(dir.clone(), e))?;
    files.retain(|x| x.is_file() && x.extension().is_some_and(|ext| ext == "toml"));
    files.sort();

    let mut plugins = vec![];
    for file in files {
        let stem = file
            .file_stem()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default();

        let manifest = Manifest::read(&file)?;
        for mut class in manifest.extractors {
            if class.module.trim().is_empty() {
                class.module = format!("{PLUGIN_PACKAGE}.{EXTRACTOR_PLUGIN_DIR}.{stem}");
            }

            info!(name = %class.name, file = ?file, "Found extractor plugin");
            plugins.push(class);
        }
    }

    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_has_no_plugins() {
        let dir = tempfile::tempdir().expect("tempdir");

        let plugins = discover(&dir.path().join("ytdlp_plugins")).expect("no error");

        assert!(plugins.is_empty());
    }

    #[test]
    fn reads_toml_files_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ext_dir = dir.path().join(EXTRACTOR_PLUGIN_DIR);
        std::fs::create_dir_all(&ext_dir).expect("create dir");

        std::fs::write(
            ext_dir.join("zeta.toml"),
            "[[extractor]]\nname = 'ZetaIE'\nbases = ['InfoExtractor']\nvalid_url = '^zeta:'\n",
        )
        .expect("write");
        std::fs::write(
            ext_dir.join("alpha.toml"),
            "[[extractor]]\nname = 'AlphaIE'\nbases = ['InfoExtractor']\nmodule = 'custom.alpha'\n",
        )
        .expect("write");
        std::fs::write(ext_dir.join("README.md"), "not a plugin").expect("write");

        let plugins = discover(dir.path()).expect("valid plugins");

        let names = plugins.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["AlphaIE", "ZetaIE"]);
        assert_eq!(plugins[0].module, "custom.alpha");
        assert_eq!(plugins[1].module, "ytdlp_plugins.extractor.zeta");
    }

    #[test]
    fn shipped_sample_plugin_is_disabled_and_unlisted() {
        let repo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");

        let plugins = discover(&repo.join(PLUGIN_PACKAGE)).expect("valid plugins");

        assert_eq!(plugins.len(), 1);
        let sample = &plugins[0];
        assert_eq!(sample.name, "SamplePluginIE");
        assert_eq!(sample.module, "ytdlp_plugins.extractor.sample");
        assert!(!sample.working);
        assert!(sample.description.is_none());
    }
}
