use std::{collections::HashMap, sync::Arc};

use sha1::Digest;

use crate::{Error, Result};

/// A hash function producing the printable signature for some signing material.
pub type HashFunction = Arc<dyn Fn(&[u8]) -> String + Send + Sync>;

/// Named hash functions available for request signing.
///
/// Names are matched case-insensitively. The default registry knows `sha1`, `sha256`,
/// `sha512` and `md5`, each rendered as lowercase hex.
#[derive(Clone)]
pub struct SignerRegistry {
    algorithms: HashMap<String, HashFunction>,
}

impl SignerRegistry {
    /// A registry with no algorithms at all.
    pub fn empty() -> Self {
        Self {
            algorithms: HashMap::new(),
        }
    }

    /// Register or replace an algorithm.
    pub fn register(
        &mut self,
        name: &str,
        hash: impl Fn(&[u8]) -> String + Send + Sync + 'static,
    ) {
        self.algorithms.insert(name.to_ascii_lowercase(), Arc::new(hash));
    }

    /// Whether `name` can be used to sign.
    pub fn supports(&self, name: &str) -> bool {
        self.algorithms.contains_key(&name.to_ascii_lowercase())
    }

    /// Hash `material` with the named algorithm.
    pub fn sign(&self, algorithm: &str, material: &str) -> Result<String> {
        let hash = self
            .algorithms
            .get(&algorithm.to_ascii_lowercase())
            .ok_or_else(|| Error::SigningAlgorithmUnsupported(algorithm.to_string()))?;
        Ok(hash(material.as_bytes()))
    }
}

impl Default for SignerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("sha1", |data| hex::encode(sha1::Sha1::digest(data)));
        registry.register("sha256", |data| hex::encode(sha2::Sha256::digest(data)));
        registry.register("sha512", |data| hex::encode(sha2::Sha512::digest(data)));
        registry.register("md5", |data| format!("{:x}", md5::compute(data)));
        registry
    }
}

impl std::fmt::Debug for SignerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.algorithms.keys().collect();
        names.sort();
        f.debug_struct("SignerRegistry")
            .field("algorithms", &names)
            .finish()
    }
}
