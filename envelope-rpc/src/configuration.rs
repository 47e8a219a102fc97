use std::collections::HashMap;

use serde::Deserialize;

use crate::{Error, Result};

/// Signing algorithm used when a service does not name one.
pub const DEFAULT_SIGN_ALGORITHM: &str = "sha1";

/// Namespace prefix used when none is configured.
pub const DEFAULT_NAMESPACE_PREFIX: &str = "Services\\";

/// Separator between the segments of a qualified proxy name.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Connection and credential settings for one remote service.
///
/// Deserializes from the `{id, secret, host, signType}` shape. Missing fields are accepted
/// here and rejected per call, so one bad entry does not take down every other service.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, rename = "id")]
    service_id: String,
    #[serde(default)]
    secret: String,
    #[serde(default, rename = "host")]
    destination: String,
    #[serde(default, rename = "signType")]
    sign_algorithm: String,
}

impl ServiceConfig {
    /// A service signed with the default algorithm.
    pub fn new(
        service_id: impl Into<String>,
        secret: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            secret: secret.into(),
            destination: destination.into(),
            sign_algorithm: String::new(),
        }
    }

    /// Sign requests to this service with a named algorithm instead of the default.
    pub fn with_sign_algorithm(mut self, sign_algorithm: impl Into<String>) -> Self {
        self.sign_algorithm = sign_algorithm.into();
        self
    }

    /// The application id presented to the remote service.
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Shared secret mixed into the signature. Never sent on the wire.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Where requests go, e.g. `http://host/path` or `tcp://host:port`.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The effective signing algorithm. Unset and empty both mean [`DEFAULT_SIGN_ALGORITHM`].
    pub fn sign_algorithm(&self) -> &str {
        if self.sign_algorithm.is_empty() {
            DEFAULT_SIGN_ALGORITHM
        } else {
            &self.sign_algorithm
        }
    }

    /// Check that everything a call needs is present.
    pub fn validate(&self, service: &str) -> Result<()> {
        let missing = if self.service_id.is_empty() {
            Some("id")
        } else if self.secret.is_empty() {
            Some("secret")
        } else if self.destination.is_empty() {
            Some("host")
        } else {
            None
        };
        match missing {
            Some(field) => Err(Error::ConfigInvalid {
                service: service.to_string(),
                field,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service_id", &self.service_id)
            .field("secret", &"<redacted>")
            .field("destination", &self.destination)
            .field("sign_algorithm", &self.sign_algorithm())
            .finish()
    }
}

/// How numeric-looking strings are written into the request envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericStrings {
    /// Strings stay strings.
    #[default]
    Preserve,
    /// Strings in `appId` and `args` that parse as numbers are written as json numbers.
    /// Servers written against loosely typed clients may expect this.
    Coerce,
}

/// Everything a [`crate::ProxyFactory`] needs. Built once, frozen when the factory takes it.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    services: HashMap<String, ServiceConfig>,
    #[serde(default = "default_namespace_prefix")]
    namespace_prefix: String,
    #[serde(default)]
    numeric_strings: NumericStrings,
}

fn default_namespace_prefix() -> String {
    DEFAULT_NAMESPACE_PREFIX.to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            services: Default::default(),
            namespace_prefix: default_namespace_prefix(),
            numeric_strings: Default::default(),
        }
    }
}

impl Configuration {
    /// Build a configuration from a service map and a namespace prefix.
    pub fn new(
        services: HashMap<String, ServiceConfig>,
        namespace_prefix: impl Into<String>,
    ) -> Self {
        Self {
            services,
            namespace_prefix: namespace_prefix.into(),
            numeric_strings: Default::default(),
        }
    }

    /// Register or replace a service.
    pub fn service(&mut self, name: impl Into<String>, config: ServiceConfig) {
        self.services.insert(name.into(), config);
    }

    /// Prefix that qualified proxy names start with.
    ///
    /// Default: `Services\`
    pub fn namespace_prefix(&mut self, namespace_prefix: impl Into<String>) {
        self.namespace_prefix = namespace_prefix.into();
    }

    /// How numeric-looking strings are encoded.
    ///
    /// Default: [`NumericStrings::Preserve`]
    pub fn numeric_strings(&mut self, numeric_strings: NumericStrings) {
        self.numeric_strings = numeric_strings;
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.get(name)
    }

    pub(crate) fn services(&self) -> impl Iterator<Item = (&String, &ServiceConfig)> {
        self.services.iter()
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.namespace_prefix
    }

    pub(crate) fn numeric_policy(&self) -> NumericStrings {
        self.numeric_strings
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserializes_wire_field_names() {
        let configuration: Configuration = serde_json::from_str(
            r#"{
                "services": {
                    "Order": {"id": "app-1", "secret": "s3cret", "host": "http://orders", "signType": "sha256"},
                    "User": {"id": "app-2", "secret": "s3cret", "host": "tcp://users:9000"}
                }
            }"#,
        )
        .expect("valid configuration");

        let order = configuration.get("Order").expect("order configured");
        assert_eq!("app-1", order.service_id());
        assert_eq!("http://orders", order.destination());
        assert_eq!("sha256", order.sign_algorithm());

        let user = configuration.get("User").expect("user configured");
        assert_eq!(DEFAULT_SIGN_ALGORITHM, user.sign_algorithm());
        assert_eq!(DEFAULT_NAMESPACE_PREFIX, configuration.prefix());
        assert_eq!(NumericStrings::Preserve, configuration.numeric_policy());
    }

    #[test]
    fn setters_override_defaults() {
        let mut configuration = Configuration::default();
        configuration.namespace_prefix("Rpc\\");
        configuration.numeric_strings(NumericStrings::Coerce);
        configuration.service("Order", ServiceConfig::new("id", "secret", "http://x"));

        assert_eq!("Rpc\\", configuration.prefix());
        assert_eq!(NumericStrings::Coerce, configuration.numeric_policy());
        assert_eq!(
            vec!["Order"],
            configuration
                .services()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_sign_type_means_default() {
        let config = ServiceConfig::new("id", "secret", "http://x").with_sign_algorithm("");
        assert_eq!("sha1", config.sign_algorithm());
    }

    #[test]
    fn validation_names_the_missing_field() {
        let cases = [
            (ServiceConfig::new("", "secret", "http://x"), "id"),
            (ServiceConfig::new("id", "", "http://x"), "secret"),
            (ServiceConfig::new("id", "secret", ""), "host"),
        ];
        for (config, expected) in cases {
            match config.validate("Order") {
                Err(Error::ConfigInvalid { service, field }) => {
                    assert_eq!("Order", service);
                    assert_eq!(expected, field);
                }
                other => panic!("expected ConfigInvalid for {expected}, got {other:?}"),
            }
        }
        assert!(ServiceConfig::new("id", "secret", "tcp://x:1")
            .validate("Order")
            .is_ok());
    }

    #[test]
    fn debug_hides_the_secret() {
        let rendered = format!("{:?}", ServiceConfig::new("id", "hunter2", "http://x"));
        assert!(!rendered.contains("hunter2"), "{rendered}");
        assert!(rendered.contains("http://x"), "{rendered}");
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"id": "app"}"#).expect("partial config parses");
        assert!(matches!(
            config.validate("Partial"),
            Err(Error::ConfigInvalid { field: "secret", .. })
        ));
    }
}
