//! Error types for compcat
//!
//! This module provides the error handling for the library, including:
//! - The crate-wide [`Error`] enum with `#[from]` conversions for network, I/O and JSON errors
//! - Classification of every error into a user-facing [`FailureKind`]
//! - The human-readable message shown in the panel for each failure
//! - Stable machine-readable error codes for logging and host integrations

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Result type alias for compcat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for compcat
///
/// Every failure that can happen inside a unit of work ends up as one of these
/// variants, gets stored in the task slot, and is rendered on the UI thread
/// through [`Error::user_message`].
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api_base_url")
        key: Option<String>,
    },

    /// Network error (DNS, connect, TLS, body stream)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The cat API answered with a non-success status
    #[error("cat API returned status {status} for {url}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// I/O error (writing the destination file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON envelope
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be built or parsed
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL text
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Every metadata request returned an animated item while GIF support is disabled
    #[error("no non-animated cat found after {attempts} attempts")]
    NoStaticCat {
        /// Number of metadata requests that were issued
        attempts: u32,
    },

    /// The host application rejected a call (node creation, settings write)
    #[error("host error: {0}")]
    Host(String),

    /// A unit of work panicked; the panic payload is kept as text
    #[error("background task panicked: {0}")]
    TaskPanicked(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// User-facing classification of a failure
///
/// Each kind maps to exactly one message template in the panel. `Unclassified`
/// is the catch-all and always carries the underlying error text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// DNS resolution failure, refused connection, timeout, bad status
    Connectivity,
    /// TLS certificate verification failed
    Certificate,
    /// No permission to write the destination
    PermissionDenied,
    /// Destination folder does not exist
    PathNotFound,
    /// Static-image retry ceiling reached
    NoStaticResult,
    /// Anything else
    Unclassified,
}

/// Classify errors into user-facing failure kinds
///
/// This trait maps domain errors to the message shown in the panel, the same
/// way the error type of a service maps onto status codes.
pub trait Classify {
    /// Get the failure kind for this error
    fn failure_kind(&self) -> FailureKind;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl Classify for Error {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Error::Network(e) => classify_network(e),
            Error::HttpStatus { .. } => FailureKind::Connectivity,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
                std::io::ErrorKind::NotFound => FailureKind::PathNotFound,
                _ => FailureKind::Unclassified,
            },
            Error::NoStaticCat { .. } => FailureKind::NoStaticResult,
            Error::Config { .. }
            | Error::Serialization(_)
            | Error::InvalidUrl { .. }
            | Error::Host(_)
            | Error::TaskPanicked(_)
            | Error::Other(_) => FailureKind::Unclassified,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => match self.failure_kind() {
                FailureKind::Certificate => "certificate_error",
                FailureKind::Connectivity => "connect_error",
                _ => "network_error",
            },
            Error::HttpStatus { .. } => "http_status",
            Error::Io(_) => match self.failure_kind() {
                FailureKind::PermissionDenied => "permission_denied",
                FailureKind::PathNotFound => "path_not_found",
                _ => "io_error",
            },
            Error::Serialization(_) => "serialization_error",
            Error::InvalidUrl { .. } => "invalid_url",
            Error::NoStaticCat { .. } => "no_static_cat",
            Error::Host(_) => "host_error",
            Error::TaskPanicked(_) => "task_panicked",
            Error::Other(_) => "internal_error",
        }
    }
}

impl Error {
    /// The single human-readable message displayed in the panel for this error
    pub fn user_message(&self) -> String {
        match self.failure_kind() {
            FailureKind::Connectivity => messages::CONNECTIVITY.to_string(),
            FailureKind::Certificate => messages::CERTIFICATE.to_string(),
            FailureKind::PermissionDenied => messages::PERMISSION_DENIED.to_string(),
            FailureKind::PathNotFound => messages::PATH_NOT_FOUND.to_string(),
            FailureKind::NoStaticResult => {
                let attempts = match self {
                    Error::NoStaticCat { attempts } => *attempts,
                    _ => 0,
                };
                format!(
                    "CompCat couldn't find a cat that isn't a GIF after {attempts} attempts. \
                     Enable GIF support in the CompCat config or try again."
                )
            }
            FailureKind::Unclassified => format!(
                "Uh oh, something weird went wrong. Error: {self}. \
                 Please check the logs or contact the developer if searching doesn't help."
            ),
        }
    }
}

/// Message templates shown in the panel
pub mod messages {
    /// Connection could not be established or the API is down
    pub const CONNECTIVITY: &str = "CompCat couldn't connect with CATAAS.com... \
         Either there's no internet connection or the cat API is down :(";

    /// TLS certificate verification failed
    pub const CERTIFICATE: &str = "CompCat couldn't connect over HTTPS with CATAAS.com because \
         the SSL certificates on this machine aren't properly configured. Either disable the \
         secure HTTPS connection in the CompCat config or fix your local certificate store.";

    /// Destination is not writable
    pub const PERMISSION_DENIED: &str = "CompCat couldn't import the cat because it doesn't have \
         permission to write to the selected folder. Please pick another folder or change the \
         folder's permission settings.";

    /// Destination folder is missing
    pub const PATH_NOT_FOUND: &str = "CompCat couldn't download the cat to the set file path. \
         Are you sure the folder path is correct?";

    /// The save dialog was cancelled or returned an empty path
    pub const EMPTY_DESTINATION: &str = "CompCat couldn't download the cat image because the \
         file path was not set correctly.";

    /// Import to the project folder was requested but no folder is configured
    pub const FOLDER_NOT_SET: &str = "CompCat couldn't import the cat because the folder where \
         cat images are stored has not yet been set. Please do so in the CompCat config menu.";
}

/// Walk the source chain of a reqwest error looking for certificate failures
///
/// TLS verification errors surface as connect errors, so the certificate check
/// has to run before the connectivity check.
fn classify_network(error: &reqwest::Error) -> FailureKind {
    if is_certificate_error(error) {
        return FailureKind::Certificate;
    }
    if error.is_connect() || error.is_timeout() || error.is_request() || error.is_body() {
        return FailureKind::Connectivity;
    }
    if error.is_status() {
        return FailureKind::Connectivity;
    }
    FailureKind::Unclassified
}

/// Verification failures as worded by openssl, rustls, schannel and
/// security-framework
const CERTIFICATE_FAILURES: &[&str] = &[
    "certificate verify failed",
    "certificate_verify_failed",
    "invalid peer certificate",
    "self signed certificate",
    "self-signed certificate",
    "unable to get local issuer certificate",
    "certificate has expired",
    "certificate is not yet valid",
    "issued by an authority that is not trusted",
    "certificate was not trusted",
];

fn is_certificate_error(error: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        let text = err.to_string().to_ascii_lowercase();
        if CERTIFICATE_FAILURES.iter().any(|phrase| text.contains(phrase)) {
            return true;
        }
        current = err.source();
    }
    false
}
