/// Result type for envelope-rpc.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by a transport. Transports are free to use whatever error type they like.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for envelope-rpc.
///
/// A call either returns the remote `data` or exactly one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configuration is registered for the service.
    #[error("Config for `{0}` not found.")]
    ConfigMissing(String),
    /// The service is configured, but a required field is empty.
    #[error("Config error: `{service}` is missing `{field}`")]
    ConfigInvalid {
        /// Service name the configuration was registered under.
        service: String,
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// No hash function is registered under this algorithm name.
    #[error("Signing algorithm `{0}` is not supported")]
    SigningAlgorithmUnsupported(String),
    /// The remote endpoint answered with `ok: false`.
    #[error("{0}")]
    RemoteError(String),
    /// The response could not be understood.
    #[error("Protocol error ({detail}), exception data:{raw}")]
    ProtocolError {
        /// What was wrong with the payload.
        detail: String,
        /// The raw response payload, verbatim.
        raw: String,
    },
    /// The transport could not be created or failed to carry the request.
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(#[source] TransportError),
    /// Arguments or typed results could not be converted to or from json.
    #[error("Encoding failure: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn protocol(detail: impl Into<String>, raw: &str) -> Self {
        Self::ProtocolError {
            detail: detail.into(),
            raw: raw.to_string(),
        }
    }
}
