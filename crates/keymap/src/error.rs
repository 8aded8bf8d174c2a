use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeymapError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}
