use thiserror::Error;

/// Broad classes of failure reported by profile operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfRange,
    InvalidArgument,
    IoFailure,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("index {index} out of range for profile of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("capacity {requested} exceeds the maximum of {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("declared k-mer count {count} is out of range (maximum {max})")]
    InvalidCount { count: i64, max: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid magic string: {0:?}")]
    InvalidMagic(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::IndexOutOfRange { .. }
            | ProfileError::CapacityExceeded { .. }
            | ProfileError::InvalidCount { .. } => ErrorKind::OutOfRange,
            ProfileError::InvalidArgument(_) | ProfileError::InvalidMagic(_) => {
                ErrorKind::InvalidArgument
            }
            ProfileError::Io(_) => ErrorKind::IoFailure,
        }
    }

    /// Malformed profile data is surfaced as a read failure
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ProfileError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            message.into(),
        ))
    }

    pub(crate) fn truncated(what: &str) -> Self {
        ProfileError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("unexpected end of data while reading {}", what),
        ))
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
