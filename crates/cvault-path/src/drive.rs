//! Drive view of OneDrive and SharePoint library paths.
//!
//! Drive items store their folders as `drives/<driveID>/root:/<folders...>`.
//! Group-owned libraries carry the owning site first:
//! `sites/<siteID>/drives/<driveID>/root:/<folders...>`.

use serde::Serialize;

use crate::builder::Builder;
use crate::elements::Elements;
use crate::error::{PathError, PathResult};
use crate::path::ResourcePath;
use crate::taxonomy::ServiceType;

pub const DRIVES: &str = "drives";
pub const SITES: &str = "sites";
pub const ROOT: &str = "root:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivePath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    pub drive_id: String,
    pub root: String,
    pub folders: Elements,
}

/// Number of folder elements ahead of `drives/<driveID>` for this chain.
fn drive_offset(p: &ResourcePath) -> usize {
    match p.service() {
        ServiceType::Groups | ServiceType::GroupsMetadata => 2,
        _ => 0,
    }
}

/// Interpret a path's folders as a drive location.
pub fn to_drive_path(p: &ResourcePath) -> PathResult<DrivePath> {
    let folders = p.folders();
    let offset = drive_offset(p);
    let need = offset + 3;

    if folders.len() < need {
        return Err(PathError::DriveFormatMismatch {
            got: folders.len(),
            need,
        });
    }

    let site_id = (offset > 0).then(|| folders[offset - 1].clone());

    Ok(DrivePath {
        site_id,
        drive_id: folders[offset + 1].clone(),
        root: folders[offset + 2].clone(),
        folders: Elements::from(&folders[need..]),
    })
}

/// `drives/<driveID>/<elements...>` as a location builder.
pub fn build_drive_location<I, S>(drive_id: &str, elements: I) -> Builder
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Builder::new().append([DRIVES, drive_id]).append(elements)
}
