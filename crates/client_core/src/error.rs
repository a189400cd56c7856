use std::fmt;

use thiserror::Error;

/// Failure reasons the persistence gateway can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// The gateway refused the record (permission or validation rule).
    PermissionDenied,
    Unavailable,
    DeadlineExceeded,
    Internal,
    InvalidResponse,
}

impl fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GatewayErrorCode::PermissionDenied => "permission-denied",
            GatewayErrorCode::Unavailable => "unavailable",
            GatewayErrorCode::DeadlineExceeded => "deadline-exceeded",
            GatewayErrorCode::Internal => "internal",
            GatewayErrorCode::InvalidResponse => "invalid-response",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("gateway error ({}): {message}", code_label(.code))]
pub struct GatewayError {
    pub code: Option<GatewayErrorCode>,
    pub message: String,
}

fn code_label(code: &Option<GatewayErrorCode>) -> String {
    code.map(|code| code.to_string())
        .unwrap_or_else(|| "no code".to_string())
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::PermissionDenied, message)
    }
}

/// User-facing failure bucket surfaced by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    AccessDenied,
    Unknown,
}

impl ErrorCategory {
    pub fn from_gateway_error(err: &GatewayError) -> Self {
        match err.code {
            Some(GatewayErrorCode::PermissionDenied) => ErrorCategory::AccessDenied,
            _ => ErrorCategory::Unknown,
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCategory::AccessDenied => {
                "Submission was rejected. Please check your details and try again."
            }
            ErrorCategory::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("failed to read client config '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse client config '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid gateway url '{url}': {source}")]
    InvalidGatewayUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("gateway url '{0}' must use http or https")]
    UnsupportedScheme(String),
}
