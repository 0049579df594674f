#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("API key is not valid metadata: {0}")]
    InvalidApiKey(#[from] tonic::metadata::errors::InvalidMetadataValue),
    #[error("failed to connect: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("request failed: {0}")]
    Status(#[from] tonic::Status),
    #[error("{0}")]
    Rejected(&'static str),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
