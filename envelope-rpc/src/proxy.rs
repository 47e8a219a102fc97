use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    response, Configuration, Connector, Error, RequestEnvelope, Result, SignerRegistry,
    Timestamp, TransportKind,
};

/// The frozen state shared by a factory and every proxy it hands out.
#[derive(Debug)]
pub(crate) struct Dispatcher {
    pub(crate) configuration: Configuration,
    pub(crate) signers: SignerRegistry,
    pub(crate) connector: Box<dyn Connector>,
}

impl Dispatcher {
    fn dispatch(
        &self,
        service: &str,
        class_name: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value> {
        let config = self
            .configuration
            .get(service)
            .ok_or_else(|| Error::ConfigMissing(service.to_string()))?;
        config.validate(service)?;

        let envelope = RequestEnvelope::new(
            config,
            service,
            class_name,
            method,
            args,
            Timestamp::now(),
        )
        .signed(config.secret(), &self.signers)?;
        let request = envelope.encode(self.configuration.numeric_policy())?;

        let kind = TransportKind::select(config.destination());
        log::debug!(
            "{service} {} -> {} via {kind:?}",
            envelope.call,
            config.destination()
        );
        let mut transport = self
            .connector
            .connect(kind, config)
            .map_err(Error::TransportUnavailable)?;
        let raw = transport
            .remote_call(&request)
            .map_err(Error::TransportUnavailable)?;
        log::trace!("{service} {} response {raw}", envelope.call);

        response::decode(&raw)
            .inspect_err(|e| log::warn!("{service} {} failed: {e}", envelope.call))
    }
}

/// A local stand-in for one remote class.
///
/// Cheap to clone, safe to share between threads. Nothing is remembered between calls.
#[derive(Debug, Clone)]
pub struct ServiceProxy {
    service_name: String,
    class_name: String,
    dispatcher: Arc<Dispatcher>,
}

impl ServiceProxy {
    pub(crate) fn new(
        service_name: String,
        class_name: String,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            service_name,
            class_name,
            dispatcher,
        }
    }

    /// The service this proxy's calls are routed to.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The remote class this proxy stands in for.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Call `method` on the remote class with positional `args`.
    pub fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        self.dispatcher
            .dispatch(&self.service_name, &self.class_name, method, args)
    }

    /// Typed form of [`ServiceProxy::invoke`], for hand-written service wrappers.
    ///
    /// `args` serializes to the positional argument list: a tuple or sequence is spread,
    /// `()` is no arguments, and anything else is a single argument.
    pub fn call<Args, Ret>(&self, method: &str, args: Args) -> Result<Ret>
    where
        Args: Serialize,
        Ret: DeserializeOwned,
    {
        let args = match serde_json::to_value(args)? {
            Value::Array(args) => args,
            Value::Null => Vec::new(),
            single => vec![single],
        };
        Ok(serde_json::from_value(self.invoke(method, args)?)?)
    }
}
