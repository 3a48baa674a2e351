//! cvault-restore: restore planning from backup details
//!
//! Turns the details entries of a backup into (storage path, restore path)
//! pairs, honouring the location refs recorded by newer backup versions and
//! falling back to the stored layout for older ones.

pub mod augment;
pub mod details;
pub mod error;
pub mod fault;
pub mod transform;

pub use augment::augment_restore_paths;
pub use details::{DetailsEntry, DetailsFile, DetailsSource, ItemInfo};
pub use error::{RestoreError, RestoreResult};
pub use fault::{Bus, FailureSink};
pub use transform::{restore_paths_for_entry, RestorePathTransformer, RestorePaths};
