pub mod config;
pub mod error;
pub mod version;

pub use error::{CvaultError, CvaultResult};
pub use version::BackupVersion;
