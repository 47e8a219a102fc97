//! Process-wide installation, for programs that want one factory reachable from anywhere.
//!
//! The first successful [`install`] wins. Later calls leave it in place and hand it back, so
//! installing from several entry points is harmless.

use std::sync::OnceLock;

use crate::{Configuration, Connector, ProxyFactory, Result};

static FACTORY: OnceLock<ProxyFactory> = OnceLock::new();

/// Install the process-wide factory, or return the one already installed.
pub fn install(
    configuration: Configuration,
    connector: impl Connector + 'static,
) -> Result<&'static ProxyFactory> {
    if let Some(factory) = FACTORY.get() {
        log::debug!("proxy factory already installed");
        return Ok(factory);
    }
    let factory = ProxyFactory::new(configuration, connector)?;
    Ok(FACTORY.get_or_init(|| factory))
}

/// The installed factory, if any.
pub fn factory() -> Option<&'static ProxyFactory> {
    FACTORY.get()
}
