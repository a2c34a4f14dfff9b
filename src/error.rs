//! Unified error handling for the findash CLI and SDK
//!
//! This module provides the normalized error representation used across the
//! crate:
//! - A closed taxonomy of error kinds and severities
//! - A pure, total classifier from HTTP status codes
//! - User-facing message mapping that never leaks raw transport text
//! - Automatic conversions from common error types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified Result type for all findash operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Closed taxonomy of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Request was sent but no response arrived
    Network,
    /// 401: credentials missing or expired
    Authentication,
    /// 403: authenticated but not allowed
    Authorization,
    /// Other 4xx: the request itself was rejected
    Validation,
    /// 5xx: the backend failed
    Server,
    /// 404
    NotFound,
    /// 408
    Timeout,
    /// Anything the classifier does not recognize
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Network,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::Validation,
        ErrorKind::Server,
        ErrorKind::NotFound,
        ErrorKind::Timeout,
        ErrorKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK",
            ErrorKind::Authentication => "AUTHENTICATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Server => "SERVER",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Escalation levels, totally ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const ALL: [ErrorSeverity; 4] = [
        ErrorSeverity::Low,
        ErrorSeverity::Medium,
        ErrorSeverity::High,
        ErrorSeverity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Low => "LOW",
            ErrorSeverity::Medium => "MEDIUM",
            ErrorSeverity::High => "HIGH",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an HTTP status code to its kind and severity
///
/// Total over all of `u16`: status 0 stands for "request sent, no response"
/// and unrecognized codes fall back to `Unknown`/`Low`.
pub fn classify_status(status: u16) -> (ErrorKind, ErrorSeverity) {
    match status {
        0 => (ErrorKind::Network, ErrorSeverity::Low),
        401 => (ErrorKind::Authentication, ErrorSeverity::High),
        403 => (ErrorKind::Authorization, ErrorSeverity::High),
        404 => (ErrorKind::NotFound, ErrorSeverity::Medium),
        408 => (ErrorKind::Timeout, ErrorSeverity::Medium),
        400..=499 => (ErrorKind::Validation, ErrorSeverity::Medium),
        500.. => (ErrorKind::Server, ErrorSeverity::Critical),
        _ => (ErrorKind::Unknown, ErrorSeverity::Low),
    }
}

// Canned user-facing copy per kind. Raw server or transport text must never
// reach the user for non-validation kinds.
const MSG_NETWORK: &str = "Network connection failed. Please check your internet connection.";
const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please login again.";
const MSG_UNAUTHORIZED: &str = "You are not authorized to perform this action.";
const MSG_VALIDATION: &str = "Please check your input and try again.";
const MSG_SERVER: &str = "Server error occurred. Please try again later.";
const MSG_NOT_FOUND: &str = "The requested resource was not found.";
const MSG_TIMEOUT: &str = "Request timeout. Please try again.";
const MSG_UNKNOWN: &str = "An unexpected error occurred. Please try again.";

/// Normalized error carried through the whole crate
///
/// Immutable once constructed; every transport or HTTP failure is converted
/// into one of these before reaching any caller.
#[derive(Error, Debug, Clone)]
#[error("[{kind}] {message}")]
pub struct AppError {
    pub message: String,
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub status_code: Option<u16>,
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl AppError {
    pub fn new(message: impl Into<String>, kind: ErrorKind, severity: ErrorSeverity) -> Self {
        Self {
            message: message.into(),
            kind,
            severity,
            status_code: None,
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Build from an HTTP response status via the classifier
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let (kind, severity) = classify_status(status);
        Self {
            message: message.into(),
            kind,
            severity,
            status_code: Some(status),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Request was sent but no response arrived
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Network,
            severity: ErrorSeverity::Low,
            status_code: Some(0),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Failure before the request was dispatched
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Unknown, ErrorSeverity::Medium)
    }

    /// Authentication failure raised locally (no stored session, etc.)
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Authentication, ErrorSeverity::High)
    }

    /// Input rejected before dispatch
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Validation, ErrorSeverity::Medium)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// User-facing copy for this error
    ///
    /// Validation errors preserve the server-supplied message verbatim when
    /// present; every other kind maps to its fixed canned sentence.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => MSG_NETWORK.to_string(),
            ErrorKind::Authentication => MSG_SESSION_EXPIRED.to_string(),
            ErrorKind::Authorization => MSG_UNAUTHORIZED.to_string(),
            ErrorKind::Validation => {
                if self.message.is_empty() {
                    MSG_VALIDATION.to_string()
                } else {
                    self.message.clone()
                }
            }
            ErrorKind::Server => MSG_SERVER.to_string(),
            ErrorKind::NotFound => MSG_NOT_FOUND.to_string(),
            ErrorKind::Timeout => MSG_TIMEOUT.to_string(),
            ErrorKind::Unknown => MSG_UNKNOWN.to_string(),
        }
    }

    /// Check if this is an authentication or authorization error
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Authentication | ErrorKind::Authorization
        )
    }

    /// Check if this is a transport-level error
    pub fn is_network_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Timeout)
    }

    /// Check if retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        self.is_network_error() || matches!(self.status_code, Some(429) | Some(503))
    }
}

// ==================== From Implementations ====================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            // The request never left the client
            Self::unknown(err.to_string())
        } else {
            Self::network("Network connection failed")
                .with_details(serde_json::json!({ "originalError": err.to_string() }))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::unknown(format!("Invalid response format: {}", err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        Self::unknown(format!("Dialog error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_statuses() {
        assert_eq!(
            classify_status(401),
            (ErrorKind::Authentication, ErrorSeverity::High)
        );
        assert_eq!(
            classify_status(403),
            (ErrorKind::Authorization, ErrorSeverity::High)
        );
        assert_eq!(
            classify_status(404),
            (ErrorKind::NotFound, ErrorSeverity::Medium)
        );
        assert_eq!(
            classify_status(408),
            (ErrorKind::Timeout, ErrorSeverity::Medium)
        );
        assert_eq!(
            classify_status(422),
            (ErrorKind::Validation, ErrorSeverity::Medium)
        );
        assert_eq!(
            classify_status(500),
            (ErrorKind::Server, ErrorSeverity::Critical)
        );
        assert_eq!(
            classify_status(503),
            (ErrorKind::Server, ErrorSeverity::Critical)
        );
        assert_eq!(classify_status(0), (ErrorKind::Network, ErrorSeverity::Low));
    }

    #[test]
    fn test_classify_is_total() {
        for status in 0..=u16::MAX {
            let (kind, _) = classify_status(status);
            assert!(ErrorKind::ALL.contains(&kind));
        }
        // Informational and redirect codes are not part of the table
        assert_eq!(classify_status(100).0, ErrorKind::Unknown);
        assert_eq!(classify_status(302).0, ErrorKind::Unknown);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Low < ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::from_status(400, "Email is already registered");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.user_message(), "Email is already registered");

        let empty = AppError::from_status(400, "");
        assert_eq!(empty.user_message(), MSG_VALIDATION);
    }

    #[test]
    fn test_non_validation_messages_are_canned() {
        let cases = [
            (401, MSG_SESSION_EXPIRED),
            (403, MSG_UNAUTHORIZED),
            (404, MSG_NOT_FOUND),
            (408, MSG_TIMEOUT),
            (500, MSG_SERVER),
            (0, MSG_NETWORK),
        ];
        for (status, expected) in cases {
            let err = AppError::from_status(status, "raw internal detail from the backend");
            assert_eq!(err.user_message(), expected, "status {}", status);
        }
    }

    #[test]
    fn test_error_display() {
        let err = AppError::from_status(401, "token expired");
        assert!(err.to_string().contains("AUTHENTICATION"));
        assert!(err.to_string().contains("token expired"));
    }

    #[test]
    fn test_predicates() {
        assert!(AppError::from_status(401, "x").is_auth_error());
        assert!(AppError::from_status(403, "x").is_auth_error());
        assert!(!AppError::from_status(500, "x").is_auth_error());

        assert!(AppError::network("down").is_network_error());
        assert!(AppError::network("down").is_retryable());
        assert!(AppError::from_status(503, "unavailable").is_retryable());
        assert!(!AppError::from_status(400, "bad").is_retryable());
    }
}
