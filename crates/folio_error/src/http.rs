//! Failures crossing the HTTP boundary.

/// A request that could not be sent, or a response with an error status.
///
/// ```
/// use folio_error::HttpError;
///
/// let refused = HttpError::new("Connection refused");
/// assert!(refused.status.is_none());
///
/// let rejected = HttpError::with_status(409, "A folder named 'Docs' already exists here");
/// assert_eq!(rejected.status, Some(409));
/// assert!(rejected.to_string().starts_with("HTTP Error: A folder named"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// Server supplied or transport message
    pub message: String,
    /// Response status, absent when no response arrived
    pub status: Option<u16>,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl HttpError {
    /// A failure without a response.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(None, message.into())
    }

    /// A response carrying a non-success `status`.
    #[track_caller]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::located(Some(status), message.into())
    }

    #[track_caller]
    fn located(status: Option<u16>, message: String) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message,
            status,
            line: location.line(),
            file: location.file(),
        }
    }
}
