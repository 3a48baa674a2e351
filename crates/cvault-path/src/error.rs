use thiserror::Error;

use crate::taxonomy::{CategoryType, ServiceType};

pub type PathResult<T> = Result<T, PathError>;

/// Every way building, parsing, or reshaping a path can fail.
///
/// Service and category names are safe to print. Resource ids and folder
/// names are not, so any offending path carried here is already concealed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("missing required path element: {0}")]
    MissingSegment(&'static str),

    #[error("unknown service token")]
    UnknownService(String),

    #[error("unknown category token")]
    UnknownCategory(String),

    #[error("unsupported service: {0}")]
    UnsupportedService(ServiceType),

    #[error("unknown service/category combination: {service}/{category}")]
    InvalidServiceCategoryPair {
        service: ServiceType,
        category: CategoryType,
    },

    #[error("service {inner} cannot be nested under {outer}")]
    InvalidSubservicePair {
        outer: ServiceType,
        inner: ServiceType,
    },

    #[error("bad escape sequence in path: '\\{0}'")]
    BadEscapeSequence(char),

    #[error("trailing escape character")]
    TrailingEscapeCharacter,

    #[error("unescaped character in path: '{0}'")]
    UnescapedReservedCharacter(char),

    #[error("path has too few segments: got {got}, need at least {need}")]
    TooFewSegments { got: usize, need: usize },

    #[error("cannot append to an item path")]
    AppendToItemPath,

    #[error("unable to shorten path")]
    DirOfMinimalPath,

    #[error("folder path doesn't match expected format for Drive items: got {got} folders, need {need}")]
    DriveFormatMismatch { got: usize, need: usize },

    #[error("parsing resource path {path}: {source}")]
    Parse {
        /// Concealed form of the offending input.
        path: String,
        source: Box<PathError>,
    },
}

impl PathError {
    pub(crate) fn parse(path: &str, source: PathError) -> Self {
        PathError::Parse {
            path: crate::elements::conceal_escaped(path),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping any `Parse` wrappers.
    pub fn root_cause(&self) -> &PathError {
        match self {
            PathError::Parse { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
