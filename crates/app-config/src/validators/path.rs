use std::path::{Component, Path};

use validator::ValidationError;

pub fn validate_is_not_directory(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("Path is empty"));
    }

    if path.is_dir() {
        return Err(ValidationError::new("Path is a directory"));
    }

    Ok(())
}

pub fn validate_is_not_empty(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("Path is empty"));
    }

    Ok(())
}

/// Two paths naming the same location after stripping `.` components and
/// trailing separators.
#[must_use]
pub fn same_location(a: &Path, b: &Path) -> bool {
    fn normal(p: &Path) -> impl Iterator<Item = Component<'_>> {
        p.components().filter(|c| !matches!(c, Component::CurDir))
    }

    normal(a).eq(normal(b))
}
