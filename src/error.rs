use serde_json::Value;
use thiserror::Error;

use crate::endpoints::Endpoint;
use crate::transport::TransportError;

/// Why a call was refused as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// The health flag was down and the probe still failed; nothing was sent.
    PreFlight,
    /// The backend answered 503.
    Http,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", unavailable_message(.origin))]
    ServiceUnavailable { origin: Unavailable },

    #[error(
        "El endpoint de {endpoint} no está disponible. Por favor, verifica la configuración del servidor."
    )]
    EndpointNotFound { endpoint: Endpoint },

    #[error("Error en {endpoint}: {status} {status_text}")]
    UnexpectedHttp {
        endpoint: Endpoint,
        status: u16,
        status_text: String,
        detail: Option<Value>,
    },

    #[error("Error de red: {0}")]
    Network(#[from] TransportError),

    #[error("Respuesta inválida de {endpoint}: {message}")]
    Decode { endpoint: Endpoint, message: String },

    #[error("Solicitud inválida: {0}")]
    InvalidRequest(String),
}

fn unavailable_message(origin: &Unavailable) -> &'static str {
    match origin {
        Unavailable::PreFlight => "El servidor no está disponible. Por favor, intenta más tarde.",
        Unavailable::Http => {
            "El servidor está temporalmente no disponible. Por favor, intenta más tarde."
        }
    }
}

impl ApiError {
    /// Transport failures and server-side faults may succeed on a later attempt;
    /// a pre-flight refusal or a client error will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::ServiceUnavailable { origin } => *origin == Unavailable::Http,
            ApiError::UnexpectedHttp { status, .. } => *status >= 500,
            ApiError::EndpointNotFound { .. }
            | ApiError::Decode { .. }
            | ApiError::InvalidRequest(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ServiceUnavailable { origin: Unavailable::Http } => Some(503),
            ApiError::EndpointNotFound { .. } => Some(404),
            ApiError::UnexpectedHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportErrorKind;

    #[test]
    fn messages_are_human_readable() {
        let err = ApiError::ServiceUnavailable { origin: Unavailable::PreFlight };
        assert_eq!(err.to_string(), "El servidor no está disponible. Por favor, intenta más tarde.");

        let err = ApiError::UnexpectedHttp {
            endpoint: Endpoint::Analyze,
            status: 500,
            status_text: "Internal Server Error".to_string(),
            detail: None,
        };
        assert_eq!(err.to_string(), "Error en analyze: 500 Internal Server Error");

        let err = ApiError::EndpointNotFound { endpoint: Endpoint::Analyze };
        assert!(err.to_string().contains("analyze"));
    }

    #[test]
    fn retryable_classification() {
        let network = ApiError::Network(TransportError::new(TransportErrorKind::Connect, "refused"));
        assert!(network.is_retryable());
        assert!(ApiError::ServiceUnavailable { origin: Unavailable::Http }.is_retryable());
        assert!(!ApiError::ServiceUnavailable { origin: Unavailable::PreFlight }.is_retryable());
        assert!(!ApiError::EndpointNotFound { endpoint: Endpoint::Chat }.is_retryable());

        let bad_gateway = ApiError::UnexpectedHttp {
            endpoint: Endpoint::Chat,
            status: 502,
            status_text: "Bad Gateway".to_string(),
            detail: None,
        };
        assert!(bad_gateway.is_retryable());
        assert_eq!(bad_gateway.status(), Some(502));

        let unprocessable = ApiError::UnexpectedHttp {
            endpoint: Endpoint::Chat,
            status: 422,
            status_text: "Unprocessable Entity".to_string(),
            detail: None,
        };
        assert!(!unprocessable.is_retryable());
    }
}
