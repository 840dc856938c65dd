use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReduxFirestoreErrorCode {
    Validation,
    Configuration,
    Internal,
}

impl ReduxFirestoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReduxFirestoreErrorCode::Validation => "redux-firestore/validation",
            ReduxFirestoreErrorCode::Configuration => "redux-firestore/configuration",
            ReduxFirestoreErrorCode::Internal => "redux-firestore/internal",
        }
    }
}

/// Error raised by descriptor validation and listener configuration checks.
///
/// Validation errors signal a malformed query descriptor and are always
/// returned synchronously to the caller. Configuration errors signal
/// integration misuse (missing store enhancer, uninitialized Firestore
/// handle) and are not recoverable by this crate.
#[derive(Clone, Debug)]
pub struct ReduxFirestoreError {
    pub code: ReduxFirestoreErrorCode,
    message: String,
}

impl ReduxFirestoreError {
    pub fn new(code: ReduxFirestoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ReduxFirestoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl Error for ReduxFirestoreError {}

pub type ReduxFirestoreResult<T> = Result<T, ReduxFirestoreError>;

pub fn validation_error(message: impl Into<String>) -> ReduxFirestoreError {
    ReduxFirestoreError::new(ReduxFirestoreErrorCode::Validation, message)
}

pub fn configuration_error(message: impl Into<String>) -> ReduxFirestoreError {
    ReduxFirestoreError::new(ReduxFirestoreErrorCode::Configuration, message)
}

pub fn internal_error(message: impl Into<String>) -> ReduxFirestoreError {
    ReduxFirestoreError::new(ReduxFirestoreErrorCode::Internal, message)
}
