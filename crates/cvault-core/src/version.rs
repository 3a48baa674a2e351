//! Backup format versions.
//!
//! Every backup records the format version it was written with. Restore logic
//! compares against these named points rather than bare integers; the
//! numeric values are part of the stored format.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupVersion(pub u32);

impl BackupVersion {
    /// No backup exists yet.
    pub const NO_BACKUP: BackupVersion = BackupVersion(0);

    /// Drive items are stored as separate data and metadata files.
    pub const ONE_DRIVE_1_DATA_AND_META_FILES: BackupVersion = BackupVersion(1);

    /// Metadata files are flagged by a marker rather than by name.
    pub const ONE_DRIVE_3_IS_META_MARKER: BackupVersion = BackupVersion(3);

    /// Folder permissions are stored in a `.dirmeta` file beside the folder.
    pub const ONE_DRIVE_4_DIR_INCLUDES_PERMISSIONS: BackupVersion = BackupVersion(4);

    /// Folder metadata moved inside the folder as an unnamed `.dirmeta`.
    pub const ONE_DRIVE_5_DIR_META_NO_NAME: BackupVersion = BackupVersion(5);

    /// Item names are carried in the metadata file.
    pub const ONE_DRIVE_6_NAME_IN_META: BackupVersion = BackupVersion(6);

    /// Every details entry carries a location reference.
    pub const ONE_DRIVE_7_LOCATION_REF: BackupVersion = BackupVersion(7);

    /// Protected resources are keyed by id instead of principal name.
    pub const ALL_8_MIGRATE_USER_PN_TO_ID: BackupVersion = BackupVersion(8);

    pub const CURRENT: BackupVersion = Self::ALL_8_MIGRATE_USER_PN_TO_ID;

    /// True when `self` is at or after `threshold`.
    pub fn at_least(self, threshold: BackupVersion) -> bool {
        self >= threshold
    }
}

impl Default for BackupVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for BackupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for BackupVersion {
    fn from(v: u32) -> Self {
        BackupVersion(v)
    }
}
