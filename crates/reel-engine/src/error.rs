use crate::codegen::CodegenError;
use crate::storage::StorageError;
use reel_common::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Code generation error: {0}")]
    Codegen(#[from] CodegenError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Recording cannot start from state {0:?}")]
    NotIdle(crate::recorder::RecorderState),

    #[error("Session {0} was already finalized")]
    AlreadyFinalized(String),
}
