//! Location-tracking error wrappers.
//!
//! Every error records the file and line that raised it through
//! `#[track_caller]`. Most wrap a `*ErrorKind` enum; a few carry only a
//! message.

macro_rules! kind_error {
    ($(#[$meta:meta])* $name:ident($kind:ident), $label:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
        #[display("{}: {} at line {} in {}", $label, kind, line, file)]
        pub struct $name {
            /// The condition that occurred
            pub kind: $kind,
            /// Line number where the error was raised
            pub line: u32,
            /// File where the error was raised
            pub file: &'static str,
        }

        impl $name {
            /// Wrap `kind` with the caller's location.
            #[track_caller]
            pub fn new(kind: $kind) -> Self {
                let location = std::panic::Location::caller();
                Self {
                    kind,
                    line: location.line(),
                    file: location.file(),
                }
            }

            /// The wrapped condition.
            pub fn kind(&self) -> &$kind {
                &self.kind
            }
        }
    };
}

macro_rules! message_error {
    ($(#[$meta:meta])* $name:ident, $label:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
        #[display("{}: {} at line {} in {}", $label, message, line, file)]
        pub struct $name {
            /// What went wrong
            pub message: String,
            /// Line number where the error occurred
            pub line: u32,
            /// File where the error occurred
            pub file: &'static str,
        }

        impl $name {
            /// Create the error at the caller's location.
            #[track_caller]
            pub fn new(message: impl Into<String>) -> Self {
                let location = std::panic::Location::caller();
                Self {
                    message: message.into(),
                    line: location.line(),
                    file: location.file(),
                }
            }
        }
    };
}

message_error!(
    /// Configuration could not be loaded or parsed.
    ///
    /// ```
    /// use folio_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing [storage] section");
    /// assert!(err.to_string().starts_with("Configuration Error: Missing [storage] section"));
    /// ```
    ConfigError,
    "Configuration Error"
);

message_error!(
    /// A request or response body was not valid JSON for its type.
    JsonError,
    "JSON Error"
);

message_error!(
    /// An optional capability the backend does not offer, such as buffered
    /// uploads on a stream-only provider.
    NotImplementedError,
    "Not Implemented"
);
