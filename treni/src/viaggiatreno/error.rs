//! ViaggiaTreno client error types.

use std::fmt;

use super::convert::ConversionError;

/// Errors from the ViaggiaTreno HTTP client.
#[derive(Debug)]
pub enum ViaggiaTrenoError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Upstream answered with a non-2xx status
    Upstream { status: u16, body: String },

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Payload parsed but could not be turned into domain types
    Conversion(ConversionError),
}

impl ViaggiaTrenoError {
    /// Whether the failure is on the transport side rather than in the data.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ViaggiaTrenoError::Http(_) | ViaggiaTrenoError::Upstream { .. }
        )
    }
}

impl fmt::Display for ViaggiaTrenoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViaggiaTrenoError::Http(e) => write!(f, "HTTP error: {e}"),
            ViaggiaTrenoError::Upstream { status, body } => {
                write!(f, "upstream error {status}")?;
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
                Ok(())
            }
            ViaggiaTrenoError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ViaggiaTrenoError::Conversion(e) => write!(f, "conversion error: {e}"),
        }
    }
}

impl std::error::Error for ViaggiaTrenoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViaggiaTrenoError::Http(e) => Some(e),
            ViaggiaTrenoError::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ViaggiaTrenoError {
    fn from(err: reqwest::Error) -> Self {
        ViaggiaTrenoError::Http(err)
    }
}

impl From<ConversionError> for ViaggiaTrenoError {
    fn from(err: ConversionError) -> Self {
        ViaggiaTrenoError::Conversion(err)
    }
}
