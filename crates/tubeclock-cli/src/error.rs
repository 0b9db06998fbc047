//! Error types for the command interface.

use thiserror::Error;

/// Reasons a single command is rejected.
///
/// The `Display` text is the human-readable reason that follows the
/// `ERROR: ` prefix on the response line. None of these are fatal: the
/// command is dropped and the interface waits for the next line.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CliError {
    /// A `set` command without a value token.
    #[error("Missing value for set command: {input}")]
    MissingValue {
        /// The line as received.
        input: String,
    },

    /// No route matches the command.
    #[error("Unknown command {input}")]
    UnknownCommand {
        /// The line as received.
        input: String,
    },

    /// A text field that must not be empty was given an empty value.
    #[error("{label} cannot be empty.")]
    EmptyText {
        /// Human name of the field (`SSID`).
        label: &'static str,
    },

    /// A text value does not fit the fixed storage.
    #[error("Invalid {label} (too long, max {max} chars).")]
    TextTooLong {
        /// Human name of the field.
        label: &'static str,
        /// Longest accepted value in bytes.
        max: usize,
    },

    /// `set bl_pattern` with nothing to resolve.
    #[error("Pattern name/index cannot be empty.")]
    EmptyPattern,

    /// Neither a valid pattern index nor a known pattern name.
    #[error("Invalid pattern name/index.")]
    UnknownPattern,

    /// Integer outside the field's declared range (or not a number at all,
    /// for fields whose error names the range).
    #[error("Invalid value for {field} (must be {min}-{max}).")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Lowest accepted value.
        min: i64,
        /// Highest accepted value.
        max: i64,
    },

    /// Text that does not scan as a base-10 integer.
    #[error("Invalid number format for {field}.")]
    InvalidNumber {
        /// Field name.
        field: &'static str,
    },

    /// Negative or non-numeric input for a non-negative decimal field.
    #[error("Invalid value for {field} (must be a non-negative number).")]
    NegativeNumber {
        /// Field name.
        field: &'static str,
    },

    /// Anything other than `true`, `false`, `1` or `0`.
    #[error("Invalid value for {field} (must be true, false, 1, or 0).")]
    InvalidBool {
        /// Field name.
        field: &'static str,
    },

    /// The configuration holds a pattern index with no name.
    #[error("Stored pattern index is invalid.")]
    StoredPatternInvalid,

    /// The configuration store reported a failure.
    #[error("Failed to save configuration ({0})")]
    SaveFailed(String),
}

/// Result type alias for command handling.
pub type CliResult<T> = Result<T, CliError>;

/// Errors raised by a [`ConfigStore`](crate::config::ConfigStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error talking to the backing medium.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored bytes could not be decoded into a configuration.
    #[error("stored configuration is corrupt: {0}")]
    Corrupt(String),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
