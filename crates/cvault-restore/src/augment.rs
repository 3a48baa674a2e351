//! Drive restore augmentation.
//!
//! Restoring a drive item needs every ancestor folder's collection to exist
//! with its metadata, not just the item's own folder. This walks each item
//! up to the drive root and adds the folder metadata (`.dirmeta`) entries in
//! the layout the backup version wrote them:
//!
//! | version | storage                   | restored into |
//! |---------|---------------------------|---------------|
//! | >= 6    | `<folder>/.dirmeta`       | folder        |
//! | >= 4    | `<folder>/<name>.dirmeta` | folder        |
//! | >= 1    | `<parent>/<name>.dirmeta` | parent        |
//! | 0       | nothing added             |               |

use std::collections::BTreeMap;

use cvault_core::BackupVersion;
use cvault_path::to_drive_path;
use tracing::debug;

use crate::error::{RestoreError, RestoreResult};
use crate::transform::RestorePaths;

pub const DIR_META_SUFFIX: &str = ".dirmeta";

/// Add folder metadata entries for drive restores and sort by storage path.
///
/// Every input must be a drive item path paired with the folder it restores
/// into. Sorting puts folder metadata ahead of the items inside it.
pub fn augment_restore_paths(
    backup_version: BackupVersion,
    mut paths: Vec<RestorePaths>,
) -> RestoreResult<Vec<RestorePaths>> {
    // Keyed by the collection's storage path string.
    let mut collections: BTreeMap<String, RestorePaths> = BTreeMap::new();

    for p in &paths {
        let mut current = p.clone();
        let mut first = true;

        loop {
            let storage = current
                .storage_path
                .dir()
                .map_err(RestoreError::Collection)?;

            let drive = to_drive_path(&storage)
                .map_err(|e| RestoreError::drive_path(&storage.to_string(), e))?;
            if drive.folders.is_empty() {
                break;
            }

            // Restore locations omit the drive root element, so they may be
            // one element shorter than the storage collection.
            if current.restore_path.elements().len() + 1 < storage.elements().len() {
                return Err(RestoreError::RestorePathTooShort {
                    restore_path: current.restore_path.conceal(),
                    storage_path: storage.conceal(),
                });
            }

            let restore = if first {
                current.restore_path.clone()
            } else {
                current
                    .restore_path
                    .dir()
                    .map_err(RestoreError::Collection)?
            };

            current = RestorePaths {
                storage_path: storage,
                restore_path: restore,
            };
            collections.insert(current.storage_path.to_string(), current.clone());
            first = false;
        }
    }

    for col in collections.values() {
        if let Some(meta) = dir_meta_paths(backup_version, col)? {
            paths.push(meta);
        }
    }

    debug!(
        collections = collections.len(),
        paths = paths.len(),
        backup_version = %backup_version,
        "augmented drive restore paths"
    );

    paths.sort_by_cached_key(|p| p.storage_path.to_string());

    Ok(paths)
}

fn dir_meta_paths(
    backup_version: BackupVersion,
    col: &RestorePaths,
) -> RestoreResult<Option<RestorePaths>> {
    let name = col.storage_path.elements().last().unwrap_or_default();
    let named = format!("{name}{DIR_META_SUFFIX}");

    let meta = if backup_version.at_least(BackupVersion::ONE_DRIVE_6_NAME_IN_META) {
        RestorePaths {
            storage_path: col
                .storage_path
                .append_item(DIR_META_SUFFIX)
                .map_err(RestoreError::Collection)?,
            restore_path: col.restore_path.clone(),
        }
    } else if backup_version.at_least(BackupVersion::ONE_DRIVE_4_DIR_INCLUDES_PERMISSIONS) {
        RestorePaths {
            storage_path: col
                .storage_path
                .append_item(&named)
                .map_err(RestoreError::Collection)?,
            restore_path: col.restore_path.clone(),
        }
    } else if backup_version.at_least(BackupVersion::ONE_DRIVE_1_DATA_AND_META_FILES) {
        let parent = col.storage_path.dir().map_err(RestoreError::Collection)?;
        RestorePaths {
            storage_path: parent.append_item(&named).map_err(RestoreError::Collection)?,
            restore_path: col.restore_path.dir().map_err(RestoreError::Collection)?,
        }
    } else {
        return Ok(None);
    };

    Ok(Some(meta))
}
