use super::MigratorState;
use crate::constants::{STATE_FILE_BACKUP_SUFFIX, STATE_FILE_PERMISSIONS};
use crate::error::{MigratorError, MigratorResult};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// File-backed storage of the [`MigratorState`] checkpoint.
///
/// Every write first moves the current file to `<path>_old`, so after a crash
/// in the middle of a write the previous checkpoint is still on disk.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    backup_path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut backup: OsString = path.clone().into_os_string();
        backup.push(STATE_FILE_BACKUP_SUFFIX);

        Self {
            path,
            backup_path: PathBuf::from(backup),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Whether a checkpoint file is present.
    pub fn exists(&self) -> MigratorResult<bool> {
        self.path
            .try_exists()
            .map_err(|e| MigratorError::state_io("stat", &self.path, e))
    }

    /// Reads the checkpoint file without validating its content.
    pub fn load(&self) -> MigratorResult<MigratorState> {
        Self::read_state(&self.path)
    }

    /// Reads the rotated backup checkpoint, if one was written.
    pub fn load_backup(&self) -> MigratorResult<MigratorState> {
        Self::read_state(&self.backup_path)
    }

    fn read_state(path: &Path) -> MigratorResult<MigratorState> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(MigratorError::StateFileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(MigratorError::state_io("read", path, e)),
        };

        serde_json::from_slice(&raw).map_err(|e| MigratorError::StateLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Rotates the current checkpoint into the backup slot and writes `state`.
    pub fn persist(&self, state: &MigratorState) -> MigratorResult<()> {
        self.rotate_backup()?;

        let data = serde_json::to_vec_pretty(state)?;
        self.write_atomically(&data)?;

        debug!(
            path = %self.path.display(),
            latest_migrated_at_index = state.latest_migrated_at_index,
            latest_included_index = state.latest_included_index,
            sending_receipt = state.sending_receipt,
            "💾 Migrator state persisted"
        );
        Ok(())
    }

    /// Moves the backup checkpoint back into place.
    ///
    /// Refuses to replace an existing checkpoint unless `force` is set.
    pub fn restore_backup(&self, force: bool) -> MigratorResult<()> {
        if !force && self.exists()? {
            return Err(MigratorError::StateFileAlreadyExists {
                path: self.path.clone(),
            });
        }

        fs::rename(&self.backup_path, &self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MigratorError::StateFileNotFound {
                    path: self.backup_path.clone(),
                }
            } else {
                MigratorError::state_io("restore", &self.backup_path, e)
            }
        })?;

        warn!(
            path = %self.path.display(),
            backup = %self.backup_path.display(),
            "♻️ Migrator state restored from backup"
        );
        Ok(())
    }

    fn rotate_backup(&self) -> MigratorResult<()> {
        match fs::rename(&self.path, &self.backup_path) {
            Ok(()) => Ok(()),
            // the very first persist has nothing to back up
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MigratorError::state_io("backup", &self.path, e)),
        }
    }

    /// Writes to a temporary sibling, syncs it and renames it over the target.
    fn write_atomically(&self, data: &[u8]) -> MigratorResult<()> {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("migrator.state");
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let result = Self::write_file(&temp_path, data)
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(MigratorError::state_io("write", &self.path, e));
        }

        #[cfg(unix)]
        {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Ok(dir) = fs::File::open(parent) {
                    let _ = dir.sync_all();
                }
            }
        }

        Ok(())
    }

    fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(STATE_FILE_PERMISSIONS))?;
        }

        file.write_all(data)?;
        file.sync_all()
    }
}
