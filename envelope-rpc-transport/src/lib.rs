//! Transports for envelope-rpc.
//!
//! [`DefaultConnector`] plugs into an `envelope_rpc::ProxyFactory` and hands out an
//! [`HttpTransport`] for `http`/`https` destinations and a [`SocketTransport`] for everything
//! else.
//!
//! Both transports are async on the inside. Each call runs on its own current-thread tokio
//! runtime and blocks the caller until the response is read. Calling them from within another
//! tokio runtime fails with [`Error::InsideRuntime`]. Connections are opened per call and
//! closed when the call returns.

mod connector;
mod error;
mod http;
mod socket;

pub use connector::DefaultConnector;
pub use error::{Error, Result};
pub use http::HttpTransport;
pub use socket::{SocketTransport, DEFAULT_MAX_LINE_LENGTH};

pub(crate) fn call_runtime() -> Result<tokio::runtime::Runtime> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::InsideRuntime);
    }
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
