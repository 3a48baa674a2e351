use thiserror::Error;

pub type CvaultResult<T> = Result<T, CvaultError>;

#[derive(Debug, Error)]
pub enum CvaultError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
