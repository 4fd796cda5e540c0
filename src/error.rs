//! Error handling for librobot
//!
//! Every failure in the crate is an [`Error`] carrying an [`ErrorCode`] and a
//! message. The code doubles as the FFI status value.

use std::fmt;
use std::sync::Mutex;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Operation succeeded
    Success = 0,
    /// Generic/unknown error
    Unknown = 1,
    /// Null pointer was passed
    NullPointer = 2,
    /// Invalid UTF-8 string
    InvalidUtf8 = 3,
    /// Invalid state for operation
    InvalidState = 4,
    /// Platform identifier is not in the registry
    UnsupportedPlatform = 5,
    /// Token rejected by the platform's local check
    InvalidCredential = 6,
    /// Webhook URL is not well-formed for the platform
    InvalidWebhookUrl = 7,
    /// Request body could not be serialized
    MessageEncodeFailed = 8,
    /// Transport-level failure (connect, TLS, timeout, ...)
    HttpRequestFailed = 9,
    /// Response body did not match the platform envelope
    HttpResponseBodyDecodeFailed = 10,
    /// Platform accepted the request but rejected the message
    SendMessageFailed = 11,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown",
            ErrorCode::NullPointer => "NullPointer",
            ErrorCode::InvalidUtf8 => "InvalidUtf8",
            ErrorCode::InvalidState => "InvalidState",
            ErrorCode::UnsupportedPlatform => "UnsupportedPlatform",
            ErrorCode::InvalidCredential => "InvalidCredential",
            ErrorCode::InvalidWebhookUrl => "InvalidWebhookUrl",
            ErrorCode::MessageEncodeFailed => "MessageEncodeFailed",
            ErrorCode::HttpRequestFailed => "HttpRequestFailed",
            ErrorCode::HttpResponseBodyDecodeFailed => "HttpResponseBodyDecodeFailed",
            ErrorCode::SendMessageFailed => "SendMessageFailed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
        }
    }

    pub fn null_pointer() -> Self {
        Error::new(ErrorCode::NullPointer, "Null pointer provided")
    }

    pub fn invalid_utf8() -> Self {
        Error::new(ErrorCode::InvalidUtf8, "Invalid UTF-8 string")
    }

    pub fn unsupported_platform(name: &str) -> Self {
        Error::new(
            ErrorCode::UnsupportedPlatform,
            format!("platform '{name}' is not supported"),
        )
    }

    pub fn invalid_credential(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::InvalidCredential, msg)
    }

    pub fn invalid_webhook_url(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::InvalidWebhookUrl, msg)
    }

    pub fn encode_failed(err: impl fmt::Display) -> Self {
        Error::new(ErrorCode::MessageEncodeFailed, err.to_string())
    }

    pub fn request_failed(err: impl fmt::Display) -> Self {
        Error::new(ErrorCode::HttpRequestFailed, err.to_string())
    }

    pub fn decode_failed(err: impl fmt::Display) -> Self {
        Error::new(ErrorCode::HttpResponseBodyDecodeFailed, err.to_string())
    }

    /// The platform's own message, carried verbatim
    pub fn send_failed(platform_message: impl Into<String>) -> Self {
        Error::new(ErrorCode::SendMessageFailed, platform_message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}

// Last-error slot shared by the FFI entry points
lazy_static::lazy_static! {
    static ref LAST_ERROR: Mutex<Option<Error>> = Mutex::new(None);
}

/// Set the last error (called internally when FFI functions fail)
pub(crate) fn set_last_error(error: Error) {
    if let Ok(mut last) = LAST_ERROR.lock() {
        *last = Some(error);
    }
}

/// Clear the last error
pub(crate) fn clear_last_error() {
    if let Ok(mut last) = LAST_ERROR.lock() {
        *last = None;
    }
}

/// Get the last error (for FFI)
pub(crate) fn get_last_error() -> Option<Error> {
    LAST_ERROR.lock().ok()?.clone()
}
