use thiserror::Error;

/// Coarse error category used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Permission,
    Validation,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Network => "Network error. Check your connection and try again.",
            ErrorKind::Permission => "You do not have permission to perform this action.",
            ErrorKind::Validation => "The request was rejected. Check the input and try again.",
            ErrorKind::Server => "The server failed to process the request. Try again later.",
            ErrorKind::Unknown => "Something went wrong. Try again.",
        }
    }
}

/// Errors surfaced by the directory to its callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Permission denied: {message}")]
    Permission { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected error: {message}")]
    Unknown { message: String },

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("A change for user {id} is still in flight")]
    MutationPending { id: String },
}

impl DirectoryError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn mutation_pending(id: impl Into<String>) -> Self {
        Self::MutationPending { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::Validation { .. } | Self::UserNotFound { .. } | Self::MutationPending { .. } => {
                ErrorKind::Validation
            }
            Self::Server { .. } => ErrorKind::Server,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }
}
