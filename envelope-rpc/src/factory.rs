use std::sync::Arc;

use serde_json::Value;

use crate::{
    configuration::NAMESPACE_SEPARATOR, proxy::Dispatcher, Configuration, Connector, Error,
    Result, ServiceProxy, SignerRegistry,
};

/// Owns the service configuration and vends [`ServiceProxy`] handles bound to it.
///
/// Construction is the only point where configuration is written. Every signing algorithm a
/// service names is checked here, so a typo fails at startup rather than on the first call.
#[derive(Debug, Clone)]
pub struct ProxyFactory {
    dispatcher: Arc<Dispatcher>,
}

impl ProxyFactory {
    /// Build a factory with the default signing algorithms.
    pub fn new(configuration: Configuration, connector: impl Connector + 'static) -> Result<Self> {
        Self::with_signers(configuration, SignerRegistry::default(), connector)
    }

    /// Build a factory with a custom set of signing algorithms.
    pub fn with_signers(
        configuration: Configuration,
        signers: SignerRegistry,
        connector: impl Connector + 'static,
    ) -> Result<Self> {
        for (name, service) in configuration.services() {
            if !signers.supports(service.sign_algorithm()) {
                log::error!(
                    "service {name} uses unsupported algorithm {}",
                    service.sign_algorithm()
                );
                return Err(Error::SigningAlgorithmUnsupported(
                    service.sign_algorithm().to_string(),
                ));
            }
        }
        log::trace!(
            "new proxy factory for {:?}, {signers:?}, {connector:?}",
            configuration.services().map(|(name, _)| name).collect::<Vec<_>>()
        );
        Ok(Self {
            dispatcher: Arc::new(Dispatcher {
                configuration,
                signers,
                connector: Box::new(connector),
            }),
        })
    }

    /// The configuration for `service`.
    pub fn resolve(&self, service: &str) -> Result<&crate::ServiceConfig> {
        self.dispatcher
            .configuration
            .get(service)
            .ok_or_else(|| Error::ConfigMissing(service.to_string()))
    }

    /// A proxy for `class_name` on `service`. Configuration is looked up per call, so this
    /// never fails.
    pub fn proxy(&self, service: &str, class_name: &str) -> ServiceProxy {
        ServiceProxy::new(
            service.to_string(),
            class_name.to_string(),
            self.dispatcher.clone(),
        )
    }

    /// A proxy for a qualified name like `Services\Order\Cart`.
    pub fn proxy_for(&self, qualified_name: &str) -> ServiceProxy {
        let (service, class_name) =
            split_qualified_name(self.dispatcher.configuration.prefix(), qualified_name);
        self.proxy(service, class_name)
    }

    /// Whether a qualified name falls under the configured namespace prefix.
    pub fn owns(&self, qualified_name: &str) -> bool {
        qualified_name.starts_with(self.dispatcher.configuration.prefix())
    }

    /// One call through a throwaway proxy.
    pub fn call(&self, qualified_name: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        self.proxy_for(qualified_name).invoke(method, args)
    }
}

/// Strip `prefix` when present, then split at the first separator into
/// `(service, class)`. The class keeps any further separators.
pub fn split_qualified_name<'a>(prefix: &str, qualified_name: &'a str) -> (&'a str, &'a str) {
    let relative = qualified_name
        .strip_prefix(prefix)
        .unwrap_or(qualified_name);
    relative
        .split_once(NAMESPACE_SEPARATOR)
        .unwrap_or((relative, ""))
}
