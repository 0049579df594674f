#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("failed to initialise patient document: {0}")]
    StorageInit(std::io::Error),
    #[error("failed to read patient document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize patient document: {0}")]
    Serialization(quick_xml::SeError),
    #[error("failed to deserialize patient document: {0}")]
    Deserialization(String),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
