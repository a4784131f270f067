use thiserror::Error;

/// Errores del cliente. Las tres clases visibles para el usuario (validación,
/// transporte y error informado por el servidor) se obtienen con
/// [`ClientError::kind`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("request could not complete: {0}")]
    Transport(String),

    #[error("server responded {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Server,
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) | ClientError::Unauthenticated => ErrorKind::Validation,
            ClientError::Transport(_) | ClientError::Storage(_) | ClientError::Config(_) => {
                ErrorKind::Transport
            }
            ClientError::Server { .. } | ClientError::Decode(_) => ErrorKind::Server,
        }
    }

    /// Mensaje entregado por el servidor, si la respuesta traía uno.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
