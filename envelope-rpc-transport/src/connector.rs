use envelope_rpc::{Connector, ServiceConfig, Transport, TransportError, TransportKind};

use crate::{socket::DEFAULT_MAX_LINE_LENGTH, HttpTransport, SocketTransport};

/// Connects [`TransportKind::Http`] to [`HttpTransport`] and [`TransportKind::Socket`] to
/// [`SocketTransport`]. Every call gets new transports.
#[derive(Debug, Clone)]
pub struct DefaultConnector {
    max_line_length: usize,
}

impl Default for DefaultConnector {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl DefaultConnector {
    /// Longest socket response line accepted.
    ///
    /// Default: 4MiB
    pub fn max_line_length(&mut self, max_line_length: usize) {
        self.max_line_length = max_line_length;
    }
}

impl Connector for DefaultConnector {
    fn connect(
        &self,
        kind: TransportKind,
        config: &ServiceConfig,
    ) -> Result<Box<dyn Transport>, TransportError> {
        log::trace!("new {kind:?} transport for {}", config.destination());
        Ok(match kind {
            TransportKind::Http => Box::new(HttpTransport::new(config.destination())?),
            TransportKind::Socket => {
                let mut transport = SocketTransport::new(config.destination());
                transport.max_line_length(self.max_line_length);
                Box::new(transport)
            }
        })
    }
}
