use std::path::{Path, PathBuf};

use app_config::{
    generator::{
        DEFAULT_BLOCKED_PLUGINS_DIR, DEFAULT_OUTPUT, DEFAULT_PLUGINS_DIR, DEFAULT_REGISTRY,
        DEFAULT_TEMPLATE,
    },
    GeneratorConfig,
};
use app_logger::{debug, info, warn};
use app_registry::ClassTable;

use crate::{
    emit::{render_module, RenderedModule},
    error::GenerateError,
    plugin_guard::PluginDirGuard,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub template: PathBuf,
    pub registry: PathBuf,
    pub plugins_dir: PathBuf,
    pub blocked_plugins_dir: PathBuf,
}
impl Default for GenerateOptions {
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
impl From<&GeneratorConfig> for GenerateOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            output: config.output.clone(),
            template: config.template.clone(),
            registry: config.registry.clone(),
            plugins_dir: config.plugins_dir.clone(),
            blocked_plugins_dir: config.blocked_plugins_dir.clone(),
        }
    }
}
impl GenerateOptions {
    /// Resolve every relative path against `root`.
    #[must_use]
    pub fn relative_to(self, root: &Path) -> Self {
        Self {
            output: root.join(self.output),
            template: root.join(self.template),
            registry: root.join(self.registry),
            plugins_dir: root.join(self.plugins_dir),
            blocked_plugins_dir: root.join(self.blocked_plugins_dir),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub table: ClassTable,
    pub module: RenderedModule,
}
impl GenerateReport {
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.module.source.len()
    }
}

/// Regenerate the lazy extractor module.
///
/// The previous output is removed first and plugins are blocked while the
/// class table is loaded, so the module only ever describes built-in
/// extractors.
#[tracing::instrument(skip_all, fields(output = ?options.output))]
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, GenerateError> {
    remove_previous(&options.output)?;

    let table = load_without_plugins(options)?;
    for (root, member) in table.roots().missing() {
        warn!("Shared member {member:?} of {root} is not declared, stand-ins will lack it");
    }

    let template = std::fs::read_to_string(&options.template)
        .map_err(|e| GenerateError::Template(options.template.clone(), e))?;

    let module = render_module(&template, &table)?;
    debug!(
        emitted = module.emitted,
        listed = module.listed.len(),
        "Rendered lazy module"
    );

    write_output(&options.output, &module.source)?;
    info!(
        "Wrote {} lazy extractors to {:?}",
        module.listed.len(),
        options.output
    );

    Ok(GenerateReport {
        output: options.output.clone(),
        table,
        module,
    })
}

fn load_without_plugins(options: &GenerateOptions) -> Result<ClassTable, GenerateError> {
    let guard = PluginDirGuard::acquire(&options.plugins_dir, &options.blocked_plugins_dir)?;
    let table = app_registry::load_table(&options.registry, &options.plugins_dir);
    guard.release()?;

    Ok(table?)
}

fn remove_previous(output: &Path) -> Result<(), GenerateError> {
    if !output.exists() {
        return Ok(());
    }

    debug!(?output, "Removing previous output");
    std::fs::remove_file(output).map_err(|e| GenerateError::RemovePrevious(output.to_path_buf(), e))
}

fn write_output(output: &Path, source: &str) -> Result<(), GenerateError> {
    if let Some(parent) = output.parent().filter(|x| !x.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| GenerateError::Write(output.to_path_buf(), e))?;
    }

    std::fs::write(output, source).map_err(|e| GenerateError::Write(output.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_the_config() {
        let config = GeneratorConfig {
            output: "out/lazy.py".into(),
            ..GeneratorConfig::default()
        };

        let options = GenerateOptions::from(&config);

        assert_eq!(options.output, Path::new("out/lazy.py"));
        assert_eq!(options.registry, Path::new(DEFAULT_REGISTRY));
        assert_eq!(GenerateOptions::from(&GeneratorConfig::default()), GenerateOptions::default());
    }

    #[test]
    fn relative_paths_are_resolved_against_root() {
        let options = GenerateOptions::default().relative_to(Path::new("/checkout"));

        assert_eq!(options.template, Path::new("/checkout").join(DEFAULT_TEMPLATE));
        assert_eq!(options.plugins_dir, Path::new("/checkout/ytdlp_plugins"));
    }
}
