use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::plugin_system::error::{LoadFailure, PluginError};
use crate::plugin_system::factory::{FactoryCatalog, PluginFactory};
use crate::plugin_system::traits::Plugin;
use crate::source::block::SourceBlock;
use crate::source::parser::{self, Declaration};

/// The bindings produced by compiling one block.
///
/// A namespace is built fresh for every load and holds only what the
/// block itself brought into scope, so nothing leaks between plugins.
pub struct Namespace {
    bindings: HashMap<String, Arc<dyn PluginFactory>>,
}

impl Namespace {
    /// Compile a block against the catalog.
    ///
    /// Structural validation of the body happens here (a malformed
    /// member is a compile failure, not an extraction failure). The
    /// declared name is then resolved to its factory and bound.
    pub fn compile(
        block: &SourceBlock,
        declaration: &Declaration,
        catalog: &FactoryCatalog,
    ) -> Result<Self, LoadFailure> {
        parser::check_body(block)?;
        let factory = catalog
            .lookup(&declaration.name)
            .ok_or_else(|| LoadFailure::UnresolvedName(declaration.name.clone()))?;
        let mut bindings = HashMap::new();
        bindings.insert(declaration.name.clone(), factory);
        Ok(Self { bindings })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PluginFactory>> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Turns an accepted block into a live instance: compile the block in a
/// fresh namespace, look the declared name up in it, construct exactly
/// one instance.
pub struct InstantiationEngine {
    catalog: FactoryCatalog,
}

impl InstantiationEngine {
    pub fn new(catalog: FactoryCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FactoryCatalog {
        &self.catalog
    }

    /// Instantiate the block under its (already resolved, possibly
    /// capability-stripped) declaration.
    ///
    /// Every failure mode, whether a malformed body, an unresolvable
    /// name, or a failing constructor, surfaces as
    /// [`PluginError::Loading`] with the original failure attached as
    /// the cause.
    pub fn instantiate(
        &self,
        block: &SourceBlock,
        declaration: &Declaration,
    ) -> Result<Arc<dyn Plugin>, PluginError> {
        let wrap = |source: LoadFailure| PluginError::Loading {
            declared_name: declaration.name.clone(),
            source: Box::new(source),
        };

        let namespace = Namespace::compile(block, declaration, &self.catalog).map_err(wrap)?;
        debug!("compiled block for '{}'", declaration.name);

        let factory = namespace
            .get(&declaration.name)
            .ok_or_else(|| wrap(LoadFailure::UnresolvedName(declaration.name.clone())))?;

        let instance = factory
            .construct()
            .map_err(|cause| wrap(LoadFailure::Construction(cause)))?;
        debug!("constructed plugin instance '{}'", instance.name());
        Ok(instance)
    }
}
