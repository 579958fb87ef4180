use std::sync::Arc;

use crate::plugin_system::identity::PluginIdentity;
use crate::plugin_system::traits::{Plugin, PluginInfo};

/// The authoritative mapping from plugin identity to live instance.
///
/// Pure data structure; replace/teardown policy lives in the
/// orchestrator. At most one instance exists per identity. Entries
/// iterate in registration order and a replace keeps its slot position,
/// so two iterations with no mutation in between always visit the same
/// sequence.
#[derive(Default)]
pub struct PluginRepository {
    entries: Vec<(PluginIdentity, Arc<dyn Plugin>)>,
}

impl PluginRepository {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PluginIdentity) -> bool {
        self.entries.iter().any(|(entry_id, _)| entry_id == id)
    }

    pub fn get(&self, id: &PluginIdentity) -> Option<Arc<dyn Plugin>> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, plugin)| plugin.clone())
    }

    /// Insert or replace, returning the previous instance so the caller
    /// can run its teardown. A replaced identity keeps its slot position.
    pub fn put(
        &mut self,
        id: PluginIdentity,
        instance: Arc<dyn Plugin>,
    ) -> Option<Arc<dyn Plugin>> {
        if let Some(slot) = self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            Some(std::mem::replace(&mut slot.1, instance))
        } else {
            self.entries.push((id, instance));
            None
        }
    }

    pub fn remove(&mut self, id: &PluginIdentity) -> Option<Arc<dyn Plugin>> {
        let index = self.entries.iter().position(|(entry_id, _)| entry_id == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Stable snapshot of the current contents, in registration order.
    pub fn snapshot(&self) -> Vec<(PluginIdentity, Arc<dyn Plugin>)> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PluginIdentity, &Arc<dyn Plugin>)> {
        self.entries.iter().map(|(id, plugin)| (id, plugin))
    }

    /// Metadata snapshot, registration order.
    pub fn infos(&self) -> Vec<PluginInfo> {
        self.entries
            .iter()
            .map(|(id, plugin)| PluginInfo {
                identity: id.as_str().to_string(),
                type_name: plugin.name().to_string(),
                version: plugin.version().to_string(),
            })
            .collect()
    }
}
