use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::event::EventDispatcher;
use crate::plugin_system::acquisition::{FsTextSource, TextSource};
use crate::plugin_system::engine::InstantiationEngine;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::factory::FactoryCatalog;
use crate::plugin_system::identity::PluginIdentity;
use crate::plugin_system::repository::PluginRepository;
use crate::plugin_system::selector::CapabilitySelector;
use crate::plugin_system::traits::{Plugin, PluginInfo};
use crate::source::extractor::BlockExtractor;

/// Lifecycle operations every plugin manager exposes.
#[async_trait]
pub trait PluginManager: Send + Sync {
    /// Load the first selector-eligible plugin declared in `text`.
    ///
    /// Atomic: any failure leaves the repository exactly as it was. On
    /// success under an already-registered identity, the previous
    /// instance's teardown hook runs and the new instance takes the slot.
    async fn load_from_text(&self, text: &str) -> Result<PluginIdentity, PluginError>;

    /// Acquire text from `location` via the configured text source, then
    /// load it. Acquisition failures surface distinctly from loading
    /// failures.
    async fn load_from_path(&self, location: &Path) -> Result<PluginIdentity, PluginError>;

    /// Remove `id`, running its teardown hook first. Returns whether a
    /// plugin was actually removed.
    ///
    /// The identity is guaranteed to be unregistered when this returns,
    /// even when the teardown hook failed; a hook failure is reported as
    /// an error, never as a lingering registration.
    async fn unload(&self, id: &PluginIdentity) -> Result<bool, PluginError>;

    /// Number of registered plugins.
    async fn plugin_count(&self) -> usize;

    /// Whether `id` is currently registered.
    async fn is_loaded(&self, id: &PluginIdentity) -> bool;

    /// The live instance registered under `id`, if any.
    async fn get_plugin(&self, id: &PluginIdentity) -> Option<Arc<dyn Plugin>>;

    /// Stable snapshot of the repository in registration order.
    async fn snapshot(&self) -> Vec<(PluginIdentity, Arc<dyn Plugin>)>;

    /// Metadata snapshot of the repository in registration order.
    async fn plugin_info(&self) -> Vec<PluginInfo>;
}

/// Default lifecycle orchestrator: extractor → selector → identity →
/// engine → repository.
pub struct DefaultPluginManager {
    engine: InstantiationEngine,
    selector: CapabilitySelector,
    repository: Arc<Mutex<PluginRepository>>,
    text_source: Arc<dyn TextSource>,
    events: EventDispatcher,
}

impl DefaultPluginManager {
    /// Manager over the given catalog, accepting the first block of any
    /// source (no capability filter).
    pub fn new(catalog: FactoryCatalog) -> Self {
        Self::with_selector(catalog, CapabilitySelector::Any)
    }

    pub fn with_selector(catalog: FactoryCatalog, selector: CapabilitySelector) -> Self {
        let repository = Arc::new(Mutex::new(PluginRepository::new()));
        Self {
            engine: InstantiationEngine::new(catalog),
            selector,
            events: EventDispatcher::new(Arc::clone(&repository)),
            repository,
            text_source: Arc::new(FsTextSource),
        }
    }

    /// Replace the acquisition collaborator (defaults to the filesystem).
    pub fn with_text_source(mut self, text_source: Arc<dyn TextSource>) -> Self {
        self.text_source = text_source;
        self
    }

    /// Broadcast handle over this manager's repository.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn selector(&self) -> &CapabilitySelector {
        &self.selector
    }

    pub fn catalog(&self) -> &FactoryCatalog {
        self.engine.catalog()
    }
}

#[async_trait]
impl PluginManager for DefaultPluginManager {
    async fn load_from_text(&self, text: &str) -> Result<PluginIdentity, PluginError> {
        let Some(block) = BlockExtractor::new(text).find(|block| self.selector.accepts(block))
        else {
            return Err(PluginError::NoEligibleCandidate {
                capability: self.selector.capability().map(str::to_string),
            });
        };

        let declaration = block
            .declaration()
            .map_err(|source| PluginError::MalformedDeclaration { source })?;
        let id = PluginIdentity::from(&declaration);

        // under a named capability, the accepted block sheds that base
        // before compilation
        let effective = match self.selector.capability() {
            Some(base) => declaration.without_base(base),
            None => declaration,
        };

        let instance = self.engine.instantiate(&block, &effective)?;

        let mut repository = self.repository.lock().await;
        if let Some(previous) = repository.get(&id) {
            debug!("replacing plugin '{id}'");
            if let Err(error) = previous.on_unload() {
                warn!("teardown of replaced plugin '{id}' failed: {error}");
            }
        }
        repository.put(id.clone(), instance);
        info!("loaded plugin '{id}'");
        Ok(id)
    }

    async fn load_from_path(&self, location: &Path) -> Result<PluginIdentity, PluginError> {
        let text = self.text_source.fetch(location).await?;
        debug!(
            "acquired {} bytes of plugin source from '{}'",
            text.len(),
            location.display()
        );
        self.load_from_text(&text).await
    }

    async fn unload(&self, id: &PluginIdentity) -> Result<bool, PluginError> {
        let mut repository = self.repository.lock().await;
        let Some(plugin) = repository.get(id) else {
            return Ok(false);
        };
        let teardown = plugin.on_unload();
        // removal is unconditional, whatever the hook did
        repository.remove(id);
        drop(repository);
        info!("unloaded plugin '{id}'");
        match teardown {
            Ok(()) => Ok(true),
            Err(error) => Err(PluginError::Teardown {
                plugin_id: id.to_string(),
                message: error.to_string(),
            }),
        }
    }

    async fn plugin_count(&self) -> usize {
        self.repository.lock().await.len()
    }

    async fn is_loaded(&self, id: &PluginIdentity) -> bool {
        self.repository.lock().await.contains(id)
    }

    async fn get_plugin(&self, id: &PluginIdentity) -> Option<Arc<dyn Plugin>> {
        self.repository.lock().await.get(id)
    }

    async fn snapshot(&self) -> Vec<(PluginIdentity, Arc<dyn Plugin>)> {
        self.repository.lock().await.snapshot()
    }

    async fn plugin_info(&self) -> Vec<PluginInfo> {
        self.repository.lock().await.infos()
    }
}
