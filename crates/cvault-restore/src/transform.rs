//! Restore path transformer: where each backed-up item lands on restore.
//!
//! For every details entry the stored repo ref is parsed back into a
//! [`ResourcePath`] and paired with a restore location computed from the
//! entry's location ref:
//!   - Exchange entries use the location ref under the stored prefix, or the
//!     bare prefix when it is empty.
//!   - Drive entries (OneDrive, SharePoint libraries) restore under
//!     `drives/<driveID>/...`, with the drive root element dropped.
//!   - Anything else is an unknown entry type.
//!
//! Entries are independent; a batch runs on a bounded rayon pool and
//! per-entry failures go to a [`FailureSink`] instead of failing the batch.

use cvault_core::config::CvaultConfig;
use cvault_core::BackupVersion;
use cvault_path::drive::{ROOT, SITES};
use cvault_path::{build_drive_location, build_prefix, to_drive_path, Builder, ResourcePath};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::details::{DetailsEntry, DetailsSource, ItemInfo};
use crate::error::{RestoreError, RestoreResult};
use crate::fault::FailureSink;

/// Where an item is stored, and where it should be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorePaths {
    pub storage_path: ResourcePath,
    /// Folder (collection) path the item is restored into.
    pub restore_path: ResourcePath,
}

/// `location` under the stored path's tenant, owner chain, and category.
/// An empty location restores to the category root.
pub fn basic_location_path(repo_ref: &ResourcePath, location: &Builder) -> RestoreResult<ResourcePath> {
    let res = if location.is_empty() {
        build_prefix(repo_ref.tenant(), repo_ref.service_resources(), repo_ref.category())
    } else {
        location.to_data_layer_path(
            repo_ref.tenant(),
            repo_ref.service_resources(),
            repo_ref.category(),
            false,
        )
    };

    res.map_err(|e| RestoreError::location_ref(&location.to_string(), e))
}

/// Restore location for a drive item: `[sites/<siteID>/]drives/<driveID>/<location...>`.
///
/// The drive id comes from the entry when recorded, else from the stored
/// path. A leading drive root element in `location` is dropped.
pub fn drive_location_path(
    repo_ref: &ResourcePath,
    info: &ItemInfo,
    location: &Builder,
) -> RestoreResult<ResourcePath> {
    let stored = to_drive_path(repo_ref);

    let drive_id = match (info.drive_id(), &stored) {
        (Some(id), _) => id.to_string(),
        (None, Ok(drive)) => drive.drive_id.clone(),
        (None, Err(e)) => {
            return Err(RestoreError::drive_path(&repo_ref.to_string(), e.clone()));
        }
    };

    let elems = location.elements();
    let folders = match elems.first() {
        Some(first) if first == ROOT => &elems[1..],
        _ => &elems[..],
    };

    let mut drive_location = build_drive_location(&drive_id, folders);
    if let Ok(cvault_path::DrivePath {
        site_id: Some(site),
        ..
    }) = &stored
    {
        drive_location = Builder::new()
            .append([SITES, site.as_str()])
            .append(drive_location.elements());
    }

    basic_location_path(repo_ref, &drive_location)
}

/// Compute the restore paths for one entry.
pub fn restore_paths_for_entry(
    entry: &DetailsEntry,
    backup_version: BackupVersion,
    threshold: BackupVersion,
) -> RestoreResult<RestorePaths> {
    let is_exchange = matches!(entry.info, ItemInfo::Exchange(_));
    if !is_exchange && !entry.info.is_drive_item() {
        return Err(RestoreError::UnrecognizedEntryType);
    }

    let storage_path = entry.storage_path()?;
    let location = entry.location_for(&storage_path, backup_version, threshold)?;

    let restore_path = if is_exchange {
        basic_location_path(&storage_path, &location)?
    } else {
        drive_location_path(&storage_path, &entry.info, &location)?
    };

    debug!(
        storage = %storage_path.conceal(),
        restore = %restore_path.conceal(),
        "computed restore path"
    );

    Ok(RestorePaths {
        storage_path,
        restore_path,
    })
}

/// Batch driver for [`restore_paths_for_entry`].
#[derive(Debug, Clone)]
pub struct RestorePathTransformer {
    /// Worker threads (0 = cpu_count)
    workers: usize,
    /// Backups at or after this version always carry a location ref
    location_ref_version: BackupVersion,
}

impl Default for RestorePathTransformer {
    fn default() -> Self {
        Self {
            workers: 0,
            location_ref_version: BackupVersion::ONE_DRIVE_7_LOCATION_REF,
        }
    }
}

impl RestorePathTransformer {
    pub fn new(workers: usize, location_ref_version: BackupVersion) -> Self {
        Self {
            workers,
            location_ref_version,
        }
    }

    pub fn from_config(config: &CvaultConfig) -> Self {
        Self::new(config.restore_workers(), config.restore.location_ref_version)
    }

    pub fn location_ref_version(&self) -> BackupVersion {
        self.location_ref_version
    }

    /// Compute restore paths for every entry.
    ///
    /// The result is index-aligned with `entries`; a failed entry leaves
    /// `None` in its slot and is reported to `sink` once. Cancellation is
    /// checked before each entry and fails the whole batch.
    pub fn transform(
        &self,
        backup_version: BackupVersion,
        entries: &[DetailsEntry],
        sink: &dyn FailureSink,
        cancel: &CancellationToken,
    ) -> RestoreResult<Vec<Option<RestorePaths>>> {
        if cancel.is_cancelled() {
            return Err(RestoreError::Cancelled);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("cvault-restore-{i}"))
            .build()?;

        let threshold = self.location_ref_version;

        let results: Vec<Option<RestorePaths>> = pool.install(|| {
            entries
                .par_iter()
                .enumerate()
                .map(|(index, entry)| {
                    if cancel.is_cancelled() {
                        return None;
                    }

                    match restore_paths_for_entry(entry, backup_version, threshold) {
                        Ok(paths) => Some(paths),
                        Err(e) => {
                            warn!(
                                index,
                                repo_ref = %cvault_path::conceal_escaped(&entry.repo_ref),
                                error = %e,
                                "restore path failed"
                            );
                            sink.add_recoverable(e);
                            None
                        }
                    }
                })
                .collect()
        });

        if cancel.is_cancelled() {
            warn!(entries = entries.len(), "restore path computation cancelled");
            return Err(RestoreError::Cancelled);
        }

        let restored = results.iter().filter(|r| r.is_some()).count();
        info!(
            entries = entries.len(),
            restored,
            failed = entries.len() - restored,
            backup_version = %backup_version,
            "restore paths computed"
        );

        Ok(results)
    }

    /// Fetch entries from `source` and transform them.
    pub fn transform_source(
        &self,
        backup_version: BackupVersion,
        source: &dyn DetailsSource,
        sink: &dyn FailureSink,
        cancel: &CancellationToken,
    ) -> RestoreResult<(Vec<DetailsEntry>, Vec<Option<RestorePaths>>)> {
        let entries = source.fetch_entries()?;
        let results = self.transform(backup_version, &entries, sink, cancel)?;
        Ok((entries, results))
    }
}
