//! Error types for Inbox Digest.

/// Top-level error type for the scanner.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mailbox provider errors (listing, fetching, marking messages).
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Credentials rejected or token refresh failed — unrecoverable
    /// without re-authentication, so this aborts the scan.
    #[error("Mailbox authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Mailbox {operation} request failed: {reason}")]
    Request {
        operation: &'static str,
        reason: String,
    },

    #[error("Mailbox {operation} returned status {status}: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },
}

/// Body extraction errors. Either one skips the affected message;
/// the scan itself continues.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Body payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decoded body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Language model analysis errors. Non-fatal per message — the caller
/// skips the message and leaves it unread.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Language model request failed: {reason}")]
    Service { reason: String },

    /// The model replied, but not with the expected JSON shape.
    /// The raw response text is retained for diagnostics.
    #[error("Language model response is not the expected JSON shape: {reason}")]
    MalformedResponse { reason: String, raw: String },
}

/// Result type alias for the scanner.
pub type Result<T> = std::result::Result<T, Error>;
