use envelope_rpc::{Transport, TransportError};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LinesCodec};

use crate::Error;

/// Default cap on the length of a response line.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4 << 20;

/// Sends a request as one newline-terminated line over a fresh tcp connection, and reads one
/// line back.
///
/// Compact json never contains a raw newline, so a line is exactly one envelope.
#[derive(Debug, Clone)]
pub struct SocketTransport {
    address: String,
    max_line_length: usize,
}

impl SocketTransport {
    /// A transport for `destination`. A leading `scheme://` (usually `tcp://`) is ignored.
    pub fn new(destination: &str) -> Self {
        let address = destination
            .split_once("://")
            .map(|(_scheme, address)| address)
            .unwrap_or(destination)
            .trim_end_matches('/');
        Self {
            address: address.to_string(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// The `host:port` this transport connects to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Longer responses are rejected.
    ///
    /// Default: 4MiB
    pub fn max_line_length(&mut self, max_line_length: usize) {
        self.max_line_length = max_line_length;
    }

    async fn exchange(&self, request: &str) -> crate::Result<String> {
        let stream = TcpStream::connect(self.address.as_str()).await?;
        stream.set_nodelay(true)?;
        log::trace!("connected to {}", self.address);

        let mut framed = Framed::new(
            stream,
            LinesCodec::new_with_max_length(self.max_line_length),
        );
        framed.send(request).await?;
        match framed.next().await {
            Some(line) => Ok(line?),
            None => Err(Error::ConnectionIsClosed),
        }
    }
}

impl Transport for SocketTransport {
    fn remote_call(&mut self, request: &str) -> Result<String, TransportError> {
        let runtime = crate::call_runtime()?;
        Ok(runtime.block_on(self.exchange(request))?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_scheme() {
        assert_eq!("svc:9000", SocketTransport::new("tcp://svc:9000").address());
        assert_eq!("svc:9000", SocketTransport::new("TCP://svc:9000/").address());
        assert_eq!("svc:9000", SocketTransport::new("svc:9000").address());
        assert_eq!("10.0.0.1:80", SocketTransport::new("ws://10.0.0.1:80").address());
    }

    #[test]
    fn refused_connection() {
        let address = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("address")
        };
        let mut transport = SocketTransport::new(&format!("tcp://{address}"));
        let error = transport.remote_call("{}").expect_err("nothing is listening");
        assert!(
            matches!(error.downcast_ref::<Error>(), Some(Error::IoFailure(_))),
            "{error}"
        );
    }

    #[test]
    fn called_from_within_a_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        let mut transport = SocketTransport::new("tcp://127.0.0.1:9");
        let error = runtime
            .block_on(async { transport.remote_call("{}") })
            .expect_err("nested runtimes are refused");
        assert!(
            matches!(error.downcast_ref::<Error>(), Some(Error::InsideRuntime)),
            "{error}"
        );
    }
}
