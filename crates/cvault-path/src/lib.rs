//! cvault-path: path addressing for cvault backups
//!
//! Every backed-up item is identified by a single escaped string:
//! ```text
//! <tenant>/<service>/<resource>[/<service>/<resource>...]/<category>/<folder>.../<item>
//! ```
//!
//! Elements are held raw and escaped only when rendered. `/` separates
//! elements and `\` escapes a literal `/` or `\` inside one. The rendered
//! string is a durable storage identity: `Display` on [`Builder`] and
//! [`ResourcePath`] produces it, and [`from_data_layer_path`] accepts it back.
//! Logs should use `conceal()` instead.

pub mod builder;
pub mod drive;
pub mod elements;
pub mod error;
pub mod escape;
pub mod path;
pub mod resource;
pub mod taxonomy;

pub use builder::{Builder, SHORT_REF_CHARACTERS};
pub use drive::{build_drive_location, to_drive_path, DrivePath};
pub use elements::{conceal_escaped, Elements};
pub use error::{PathError, PathResult};
pub use escape::{split, trim_trailing_slash};
pub use path::{build, build_prefix, from_data_layer_path, ResourcePath};
pub use resource::{new_service_resources, validate_service_resources, ServiceResource};
pub use taxonomy::{
    validate_service_and_category, validate_service_and_category_strings,
    validate_service_and_subservice, CategoryType, ServiceType,
};
