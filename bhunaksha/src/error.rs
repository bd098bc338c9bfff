//! Types d'erreurs pour le crate bhunaksha

use thiserror::Error;

/// Erreurs pouvant survenir lors des échanges avec le service Bhunaksha
#[derive(Debug, Error)]
pub enum BhunakshaError {
    /// Erreur de transport (connexion, timeout, TLS)
    #[error("HTTP error on {endpoint}: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Réponse HTTP non 2xx
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Réponse illisible (JSON invalide ou structure inattendue)
    #[error("Invalid response from {endpoint}: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    /// Parcelle renvoyée sans géométrie
    #[error("Plot {plot} has no geometry")]
    MissingGeometry { plot: String },

    /// Configuration client invalide
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl BhunakshaError {
    /// Crée une erreur de décodage avec contexte
    pub fn decode(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de transport
    pub fn http(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Http { endpoint, source }
    }
}
