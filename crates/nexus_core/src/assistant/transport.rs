//! Transport seam between the assistant and a generative text backend.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AssistantResult<T> = Result<T, AssistantError>;

/// One prompt sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Asks the backend for an `application/json` body instead of free text.
    pub json_response: bool,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_response: false,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_response: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    Timeout,
    Network { message: String, retryable: bool },
    Http { status: u16 },
    MissingCredentials,
    EmptyResponse,
    Parse(String),
}

impl AssistantError {
    /// Timeouts, connection failures, 408, 429 and 5xx are worth one more attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Network { retryable, .. } => *retryable,
            Self::Http { status } => matches!(status, 408 | 429 | 500..=599),
            Self::MissingCredentials | Self::EmptyResponse | Self::Parse(_) => false,
        }
    }

    /// Stable token for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::MissingCredentials => "missing_credentials",
            Self::EmptyResponse => "empty_response",
            Self::Parse(_) => "parse",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Network {
                retryable: err.is_connect(),
                message: err.to_string(),
            }
        }
    }
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "assistant request timed out"),
            Self::Network { message, .. } => write!(f, "assistant network error: {message}"),
            Self::Http { status } => write!(f, "assistant backend returned HTTP {status}"),
            Self::MissingCredentials => write!(f, "assistant API key is not configured"),
            Self::EmptyResponse => write!(f, "assistant returned an empty response"),
            Self::Parse(message) => write!(f, "assistant response could not be parsed: {message}"),
        }
    }
}

impl Error for AssistantError {}

/// Sends a prompt and returns the generated text, possibly empty.
pub trait GenerativeTransport {
    fn generate(&self, request: &GenerateRequest) -> AssistantResult<String>;
}

impl<T: GenerativeTransport + ?Sized> GenerativeTransport for Box<T> {
    fn generate(&self, request: &GenerateRequest) -> AssistantResult<String> {
        (**self).generate(request)
    }
}
