//! Backup details entries and the sources that supply them.
//!
//! Each entry records where an item is stored (`repoRef`), where it should
//! appear to the user (`locationRef`), and exactly one service-specific info
//! block. Serialised field names match the stored details format.

use std::path::{Path, PathBuf};

use cvault_core::BackupVersion;
use cvault_path::{from_data_layer_path, to_drive_path, Builder, ResourcePath};
use serde::{Deserialize, Serialize};

use crate::error::{RestoreError, RestoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsEntry {
    pub repo_ref: String,
    pub short_ref: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_ref: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location_ref: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub item_ref: String,
    #[serde(default)]
    pub updated: bool,
    #[serde(flatten)]
    pub info: ItemInfo,
}

/// The service-specific half of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemInfo {
    Exchange(ExchangeInfo),
    OneDrive(OneDriveInfo),
    SharePoint(SharePointInfo),
    Folder(FolderInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExchangeItemType {
    Mail,
    Contact,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub item_type: ExchangeItemType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_path: String,
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneDriveInfo {
    #[serde(rename = "driveID", default, skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub item_name: String,
    #[serde(default)]
    pub parent_path: String,
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SharePointItemType {
    Library,
    List,
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePointInfo {
    pub item_type: SharePointItemType,
    #[serde(rename = "driveID", default, skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub item_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_path: String,
    #[serde(rename = "siteID", default, skip_serializing_if = "String::is_empty")]
    pub site_id: String,
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    pub display_name: String,
    #[serde(rename = "driveID", default, skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
}

impl ItemInfo {
    /// OneDrive items and SharePoint library items live in a drive.
    pub fn is_drive_item(&self) -> bool {
        matches!(
            self,
            ItemInfo::OneDrive(_)
                | ItemInfo::SharePoint(SharePointInfo {
                    item_type: SharePointItemType::Library,
                    ..
                })
        )
    }

    /// The drive id recorded on the entry, if any.
    pub fn drive_id(&self) -> Option<&str> {
        let id = match self {
            ItemInfo::OneDrive(i) => &i.drive_id,
            ItemInfo::SharePoint(i) => &i.drive_id,
            ItemInfo::Folder(i) => &i.drive_id,
            ItemInfo::Exchange(_) => return None,
        };

        (!id.is_empty()).then_some(id.as_str())
    }
}

impl DetailsEntry {
    /// Parse the stored item path.
    pub fn storage_path(&self) -> RestoreResult<ResourcePath> {
        from_data_layer_path(&self.repo_ref, true)
            .map_err(|e| RestoreError::repo_ref(&self.repo_ref, e))
    }

    /// The folder location this entry should be restored under, relative to
    /// its service/category prefix.
    ///
    /// Backups at or after `threshold` always carry a location ref, so an
    /// empty one means the item sits at the root. Older backups may have
    /// none and fall back to the stored path's folders; for drive items the
    /// `drives/<id>` elements are dropped and the drive root kept.
    pub fn resolve_location_ref(
        &self,
        backup_version: BackupVersion,
        threshold: BackupVersion,
    ) -> RestoreResult<Builder> {
        let storage = self.storage_path()?;
        self.location_for(&storage, backup_version, threshold)
    }

    pub(crate) fn location_for(
        &self,
        storage: &ResourcePath,
        backup_version: BackupVersion,
        threshold: BackupVersion,
    ) -> RestoreResult<Builder> {
        if !self.location_ref.is_empty() || backup_version.at_least(threshold) {
            return Builder::new()
                .split_unescape_append(&self.location_ref)
                .map_err(|e| RestoreError::location_ref(&self.location_ref, e));
        }

        if !self.info.is_drive_item() {
            return Ok(Builder::new().append(&storage.folders()));
        }

        let drive = to_drive_path(storage).map_err(|e| RestoreError::drive_path(&self.repo_ref, e))?;

        Ok(Builder::new().append([drive.root]).append(&drive.folders))
    }
}

/// Supplies the details entries of one backup.
pub trait DetailsSource {
    fn fetch_entries(&self) -> RestoreResult<Vec<DetailsEntry>>;
}

impl DetailsSource for Vec<DetailsEntry> {
    fn fetch_entries(&self) -> RestoreResult<Vec<DetailsEntry>> {
        Ok(self.clone())
    }
}

/// Details stored as JSON on disk: either a bare array of entries or an
/// object with an `entries` array.
#[derive(Debug, Clone)]
pub struct DetailsFile {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailsDocument {
    Entries(Vec<DetailsEntry>),
    Wrapped { entries: Vec<DetailsEntry> },
}

impl DetailsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetailsSource for DetailsFile {
    fn fetch_entries(&self) -> RestoreResult<Vec<DetailsEntry>> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            RestoreError::DetailsIo {
                path: self.path.clone(),
                source,
            }
        })?;

        let entries = match serde_json::from_str(&content)? {
            DetailsDocument::Entries(entries) => entries,
            DetailsDocument::Wrapped { entries } => entries,
        };

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "loaded details");

        Ok(entries)
    }
}
