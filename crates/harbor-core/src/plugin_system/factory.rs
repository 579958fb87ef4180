use std::collections::HashMap;
use std::sync::Arc;

use semver::{Version, VersionReq};

use crate::plugin_system::error::PluginError;
use crate::plugin_system::traits::Plugin;

/// The API version the host advertises to factories at registration.
pub fn host_api_version() -> Version {
    Version::new(0, 1, 0)
}

/// Object-safe construction error for factory authors.
pub type ConstructError = Box<dyn std::error::Error + Send + Sync>;

/// A discoverable unit that can produce one plugin instance under a
/// declared name.
///
/// Factories are the compiled-ahead-of-time counterpart to source text:
/// loading a block means resolving its declared name to a factory and
/// asking that factory for exactly one instance, with no external
/// arguments. Construction may run arbitrary code; the engine wraps any
/// failure and never partially registers.
pub trait PluginFactory: Send + Sync {
    /// The declared name this factory registers under.
    fn declared_name(&self) -> &str;

    /// Host API versions this factory can run against.
    fn api_requirement(&self) -> VersionReq {
        VersionReq::STAR
    }

    /// Construct exactly one instance.
    fn construct(&self) -> Result<Arc<dyn Plugin>, ConstructError>;
}

struct FnFactory<F> {
    name: String,
    construct: F,
}

impl<F> PluginFactory for FnFactory<F>
where
    F: Fn() -> Result<Arc<dyn Plugin>, ConstructError> + Send + Sync,
{
    fn declared_name(&self) -> &str {
        &self.name
    }

    fn construct(&self) -> Result<Arc<dyn Plugin>, ConstructError> {
        (self.construct)()
    }
}

/// Wrap a closure as a [`PluginFactory`] for hosts that don't want a
/// dedicated factory type.
pub fn factory<F>(declared_name: impl Into<String>, construct: F) -> Arc<dyn PluginFactory>
where
    F: Fn() -> Result<Arc<dyn Plugin>, ConstructError> + Send + Sync + 'static,
{
    Arc::new(FnFactory {
        name: declared_name.into(),
        construct,
    })
}

/// The set of factories a manager resolves declared names against.
pub struct FactoryCatalog {
    host_version: Version,
    factories: HashMap<String, Arc<dyn PluginFactory>>,
}

impl FactoryCatalog {
    /// Catalog speaking the current host API version.
    pub fn new() -> Self {
        Self::with_host_version(host_api_version())
    }

    pub fn with_host_version(host_version: Version) -> Self {
        Self {
            host_version,
            factories: HashMap::new(),
        }
    }

    pub fn host_version(&self) -> &Version {
        &self.host_version
    }

    /// Register a factory under its declared name.
    ///
    /// Rejects duplicate names and factories whose API requirement the
    /// host does not satisfy.
    pub fn register(&mut self, factory: Arc<dyn PluginFactory>) -> Result<(), PluginError> {
        let name = factory.declared_name().to_string();
        if self.factories.contains_key(&name) {
            return Err(PluginError::Registration {
                declared_name: name,
                message: "a factory is already registered under this name".to_string(),
            });
        }
        let requirement = factory.api_requirement();
        if !requirement.matches(&self.host_version) {
            return Err(PluginError::Registration {
                declared_name: name,
                message: format!(
                    "requires host API {requirement}, host provides {}",
                    self.host_version
                ),
            });
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn lookup(&self, declared_name: &str) -> Option<Arc<dyn PluginFactory>> {
        self.factories.get(declared_name).cloned()
    }

    /// Registered declared names, sorted for stable presentation.
    pub fn declared_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for FactoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}
