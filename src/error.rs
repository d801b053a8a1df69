use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("unsupported signature magic {0:#010x}")]
    UnsupportedAlgorithm(u32),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SignatureError {
    /// Unknown algorithm tags count as configuration errors too.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            SignatureError::UnsupportedAlgorithm(_) | SignatureError::InvalidConfiguration(_)
        )
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, SignatureError::MalformedSignature(_))
    }
}

pub type Result<T> = std::result::Result<T, SignatureError>;
