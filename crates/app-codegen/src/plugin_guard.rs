use std::path::{Path, PathBuf};

use app_config::validators::path::same_location;
use app_logger::{debug, error, warn};

use crate::error::GuardError;

/// Keeps the plugin directory renamed out of the way for as long as it lives.
///
/// Renaming the directory away is the acquisition, renaming it back is the
/// release. The release runs on [`PluginDirGuard::release`] or, failing that,
/// on drop, so an error or panic while the guard is held still puts the
/// directory back.
#[derive(Debug)]
pub struct PluginDirGuard {
    plugins_dir: PathBuf,
    blocked_dir: PathBuf,
    active: bool,
}
impl PluginDirGuard {
    pub fn acquire<P, B>(plugins_dir: P, blocked_dir: B) -> Result<Self, GuardError>
    where
        P: Into<PathBuf>,
        B: Into<PathBuf>,
    {
        let mut guard = Self {
            plugins_dir: plugins_dir.into(),
            blocked_dir: blocked_dir.into(),
            active: false,
        };

        if same_location(&guard.plugins_dir, &guard.blocked_dir) {
            return Err(GuardError::SamePath(guard.plugins_dir.clone()));
        }

        match (guard.plugins_dir.exists(), guard.blocked_dir.exists()) {
            (false, false) => {
                debug!(dir = ?guard.plugins_dir, "No plugin directory to block");
                return Ok(guard);
            }
            (true, true) => {
                return Err(GuardError::Conflict {
                    plugins: guard.plugins_dir.clone(),
                    blocked: guard.blocked_dir.clone(),
                });
            }
            (false, true) => {
                warn!(
                    dir = ?guard.blocked_dir,
                    "Found a blocked plugin directory from an interrupted run, restoring it"
                );
                rename(&guard.blocked_dir, &guard.plugins_dir)?;
            }
            (true, false) => {}
        }

        rename(&guard.plugins_dir, &guard.blocked_dir)?;
        guard.active = true;
        debug!(from = ?guard.plugins_dir, to = ?guard.blocked_dir, "Blocked plugins");

        Ok(guard)
    }

    /// Whether a directory was actually moved away.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    #[must_use]
    pub fn blocked_dir(&self) -> &Path {
        &self.blocked_dir
    }

    /// Put the plugin directory back, reporting failure to the caller.
    pub fn release(mut self) -> Result<(), GuardError> {
        self.restore()
    }

    fn restore(&mut self) -> Result<(), GuardError> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        rename(&self.blocked_dir, &self.plugins_dir)?;
        debug!(dir = ?self.plugins_dir, "Restored plugins");

        Ok(())
    }
}

impl Drop for PluginDirGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            error!(
                "Failed to restore plugin directory, move {:?} back to {:?} manually: {e}",
                self.blocked_dir, self.plugins_dir
            );
        }
    }
}

fn rename(from: &Path, to: &Path) -> Result<(), GuardError> {
    std::fs::rename(from, to).map_err(|source| GuardError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    struct Dirs {
        _tmp: tempfile::TempDir,
        plugins: PathBuf,
        blocked: PathBuf,
    }

    fn dirs() -> Dirs {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plugins = tmp.path().join("ytdlp_plugins");
        let blocked = tmp.path().join("ytdlp_plugins_blocked");

        Dirs {
            _tmp: tmp,
            plugins,
            blocked,
        }
    }

    #[test]
    fn blocks_and_releases() {
        let d = dirs();
        std::fs::create_dir_all(d.plugins.join("extractor")).expect("create dir");

        let guard = PluginDirGuard::acquire(&d.plugins, &d.blocked).expect("acquired");
        assert!(guard.is_active());
        assert!(!d.plugins.exists());
        assert!(d.blocked.join("extractor").is_dir());

        guard.release().expect("released");
        assert!(d.plugins.join("extractor").is_dir());
        assert!(!d.blocked.exists());
    }

    #[test]
    fn restores_on_drop() {
        let d = dirs();
        std::fs::create_dir_all(&d.plugins).expect("create dir");

        {
            let _guard = PluginDirGuard::acquire(&d.plugins, &d.blocked).expect("acquired");
            assert!(!d.plugins.exists());
        }

        assert!(d.plugins.is_dir());
        assert!(!d.blocked.exists());
    }

    #[test]
    fn restores_on_panic() {
        let d = dirs();
        std::fs::create_dir_all(&d.plugins).expect("create dir");

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = PluginDirGuard::acquire(&d.plugins, &d.blocked).expect("acquired");
            panic!("interrupted while plugins are blocked");
        }));

        assert!(result.is_err());
        assert!(d.plugins.is_dir());
        assert!(!d.blocked.exists());
    }

    #[test]
    fn missing_plugin_directory_is_a_no_op() {
        let d = dirs();

        let guard = PluginDirGuard::acquire(&d.plugins, &d.blocked).expect("acquired");

        assert!(!guard.is_active());
        guard.release().expect("released");
        assert!(!d.plugins.exists());
    }

    #[test]
    fn stale_blocked_directory_is_recovered() {
        let d = dirs();
        std::fs::create_dir_all(d.blocked.join("extractor")).expect("create dir");

        let guard = PluginDirGuard::acquire(&d.plugins, &d.blocked).expect("acquired");
        assert!(guard.is_active());
        drop(guard);

        assert!(d.plugins.join("extractor").is_dir());
        assert!(!d.blocked.exists());
    }

    #[test]
    fn both_directories_present_is_a_conflict() {
        let d = dirs();
        std::fs::create_dir_all(&d.plugins).expect("create dir");
        std::fs::create_dir_all(&d.blocked).expect("create dir");

        let err = PluginDirGuard::acquire(&d.plugins, &d.blocked).unwrap_err();

        assert!(matches!(err, GuardError::Conflict { .. }));
        assert!(d.plugins.is_dir());
        assert!(d.blocked.is_dir());
    }

    #[test]
    fn same_path_is_rejected() {
        let d = dirs();

        let err = PluginDirGuard::acquire(&d.plugins, &d.plugins).unwrap_err();

        assert!(matches!(err, GuardError::SamePath(_)));
    }

    #[test]
    fn aliased_same_path_is_rejected() {
        let err = PluginDirGuard::acquire("ytdlp_plugins", "./ytdlp_plugins/").unwrap_err();

        assert!(matches!(err, GuardError::SamePath(_)));
    }
}
