//! The extractor class hierarchy as declarative data.
//!
//! Instead of inspecting live classes, every extractor is registered once as
//! an [`ExtractorClass`] record (name, bases, module, pattern, flags and an
//! optional `suitable` override) in a [`ClassTable`]. Code generation only
//! ever reads this table.

use std::path::Path;

use app_logger::debug;

pub mod class;
pub mod error;
pub mod manifest;
pub mod matching;
pub mod plugins;
pub mod py_value;
pub mod source;
pub mod table;

pub use class::{BaseRef, ExtractorClass, RootBase, SelfHostedField, SelfHostedFields};
pub use error::RegistryError;
pub use manifest::Manifest;
pub use matching::{Claim, Matcher, Verdict};
pub use py_value::PyValue;
pub use source::MemberSource;
pub use table::{ClassTable, NamedMember, RootMembers, SelfHostedRoot};

/// Load the built-in class table and register any discovered plugins ahead
/// of the built-in classes.
pub fn load_table(registry: &Path, plugins_dir: &Path) -> Result<ClassTable, RegistryError> {
    let table = ClassTable::from_manifest(registry)?;
    let plugins = plugins::discover(plugins_dir)?;

    debug!(
        builtin = table.len(),
        plugins = plugins.len(),
        "Loaded extractor classes"
    );

    if plugins.is_empty() {
        return Ok(table);
    }

    table.with_prepended(plugins)
}
