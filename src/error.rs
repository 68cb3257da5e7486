use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Authentication failed ({provider}): {message}")]
    Auth { provider: String, message: String },

    #[error("Rate limited by {provider}: {message}")]
    RateLimit { provider: String, message: String },

    #[error("Unsupported request ({provider}): {message}")]
    Unsupported { provider: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(
        "All AI models are currently experiencing issues or rate limits. \
         Please try again later. Tried {attempts} model(s). Last error: {last_error}"
    )]
    Exhausted { attempts: usize, last_error: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl Error {
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
            status_code: None,
        }
    }

    pub fn api_with_status(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn rate_limit(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Terminal errors stop the fallback loop; everything else moves on
    /// to the next candidate.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Auth { .. } | Self::Exhausted { .. } | Self::Config(_) | Self::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
