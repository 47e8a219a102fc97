use crate::{ServiceConfig, TransportError};

/// Which family of transport carries a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Request posted over http(s).
    Http,
    /// Request written to a raw socket. Anything that is not http ends up here.
    Socket,
}

impl TransportKind {
    /// Pick a transport for a destination. `http` prefixes (any case) select [`TransportKind::Http`];
    /// everything else, including `tcp://` and bare `host:port`, selects [`TransportKind::Socket`].
    pub fn select(destination: &str) -> Self {
        let is_http = destination
            .as_bytes()
            .get(..4)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case(b"http"));
        if is_http {
            Self::Http
        } else {
            Self::Socket
        }
    }
}

/// Carries one serialized request and returns the serialized response.
///
/// Implementations block the calling thread until the response is in hand. They own their
/// connection state and release it when dropped.
pub trait Transport {
    /// Send `request`, wait for the response.
    fn remote_call(&mut self, request: &str) -> Result<String, TransportError>;
}

/// Creates transports. A fresh transport is requested for every call.
pub trait Connector: std::fmt::Debug + Send + Sync {
    /// Create a transport of `kind` for the service described by `config`.
    fn connect(
        &self,
        kind: TransportKind,
        config: &ServiceConfig,
    ) -> Result<Box<dyn Transport>, TransportError>;
}
