use std::fmt;

use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////
// Error kind
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Retryable,
    Terminal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Retryable => "retryable",
            ErrorKind::Terminal => "terminal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
    "SlowDown",
    "PriorRequestNotComplete",
];

const SERVER_FAULT_CODES: &[&str] = &[
    "InternalError",
    "InternalFailure",
    "ServiceUnavailable",
    "RequestTimeout",
    "RequestTimeoutException",
];

/// Decides whether a provider error is worth another attempt, from its error
/// code and the HTTP status of the response that carried it.
pub fn classify(code: Option<&str>, status: Option<u16>) -> ErrorKind {
    if let Some(code) = code {
        if THROTTLING_CODES.contains(&code) || SERVER_FAULT_CODES.contains(&code) {
            return ErrorKind::Retryable;
        }
    }

    match status {
        Some(429) => ErrorKind::Retryable,
        Some(s) if (500..600).contains(&s) => ErrorKind::Retryable,
        _ => ErrorKind::Terminal,
    }
}

////////////////////////////////////////////////////////////
// Error
////////////////////////////////////////////////////////////
#[derive(Debug)]
pub enum Error {
    Api {
        op: String,
        kind: ErrorKind,
        message: String,
    },
    PaginationError(String),
    ConfigError(String),
    ParseError(String),
    IoError(std::io::Error),
}

impl Error {
    pub fn api(op: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::Api {
            op: op.to_string(),
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Api { kind, .. } => *kind,
            _ => ErrorKind::Terminal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Retryable
    }

    /// Maps an AWS SDK failure of operation `op` onto the crate taxonomy.
    pub fn from_sdk<E>(op: &str, err: SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        let (kind, message) = match &err {
            SdkError::ServiceError(ctx) => {
                let service_err = ctx.err();
                let status = ctx.raw().status().as_u16();
                let code = service_err.code();
                let message = format!(
                    "{} (status {}): {}",
                    code.unwrap_or("unknown error"),
                    status,
                    service_err.message().unwrap_or("no message")
                );
                (classify(code, Some(status)), message)
            }
            SdkError::TimeoutError(_) => (ErrorKind::Retryable, "request timed out".to_string()),
            SdkError::DispatchFailure(failure) => {
                let kind = if failure.is_user() {
                    ErrorKind::Terminal
                } else {
                    ErrorKind::Retryable
                };
                (kind, format!("dispatch failure: {}", DisplayErrorContext(&err)))
            }
            SdkError::ResponseError(_) => (
                ErrorKind::Retryable,
                format!("unreadable response: {}", DisplayErrorContext(&err)),
            ),
            _ => (ErrorKind::Terminal, DisplayErrorContext(&err).to_string()),
        };

        Error::api(op, kind, message)
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Api { op, kind, message } => write!(f, "{} failed ({}): {}", op, kind, message),
            Error::PaginationError(e) => write!(f, "Pagination error: {}", e),
            Error::ConfigError(e) => write!(f, "Config error: {}", e),
            Error::ParseError(e) => write!(f, "Parse error: {}", e),
            Error::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::ConfigError(err.to_string())
    }
}
