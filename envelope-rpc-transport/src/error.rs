/// Result type for envelope-rpc-transport.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for envelope-rpc-transport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO failure: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("Framing failure: {0}")]
    Framing(#[from] tokio_util::codec::LinesCodecError),
    #[error("Http failure: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection closed before a response arrived")]
    ConnectionIsClosed,
    #[error("Blocking transports cannot be called from within a tokio runtime")]
    InsideRuntime,
}
