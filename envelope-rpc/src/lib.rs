//! Envelope RPC
//!
//! Call methods on remote services as if they were local objects. A [`ProxyFactory`] holds
//! the per-service configuration (application id, shared secret, destination and signing
//! algorithm) and hands out [`ServiceProxy`] handles, one per remote class. Invoking a
//! method on a proxy:
//!
//! * builds a [`RequestEnvelope`] naming the service, `Class::method`, the arguments and a
//!   timestamp,
//! * signs it with the service's secret through a [`SignerRegistry`],
//! * picks a transport for the destination with [`TransportKind::select`] and asks the
//!   configured [`Connector`] for one,
//! * decodes the response into the returned data or an [`Error`].
//!
//! Calls are synchronous and independent. There is no pooling, retrying or timeout here; a
//! transport that hangs hangs the call.
//!
//! This crate does not talk to the network. `envelope-rpc-transport` provides http and
//! socket transports, or you can implement [`Transport`] and [`Connector`] yourself.

#![deny(missing_docs)]

mod configuration;
mod envelope;
mod error;
mod factory;
mod proxy;
mod response;
mod signer;
mod transport;

pub mod global;

pub use configuration::{
    Configuration, NumericStrings, ServiceConfig, DEFAULT_NAMESPACE_PREFIX,
    DEFAULT_SIGN_ALGORITHM, NAMESPACE_SEPARATOR,
};
pub use envelope::{RequestEnvelope, Timestamp};
pub use error::{Error, Result, TransportError};
pub use factory::{split_qualified_name, ProxyFactory};
pub use proxy::ServiceProxy;
pub use response::{decode, ResponseEnvelope};
pub use signer::{HashFunction, SignerRegistry};
pub use transport::{Connector, Transport, TransportKind};
