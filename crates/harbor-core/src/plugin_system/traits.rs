use std::any::Any;

use serde::Serialize;

use crate::plugin_system::error::PluginError;

/// Snapshot metadata describing one registered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Identity the instance is registered under.
    pub identity: String,
    /// Implementation name reported by the instance itself.
    pub type_name: String,
    /// Implementation version.
    pub version: String,
}

/// Core trait every live plugin instance implements.
///
/// Instances are produced by a [`PluginFactory`](crate::plugin_system::factory::PluginFactory)
/// during a load and owned exclusively by the repository afterwards; no
/// other component keeps a reference once registration completes.
pub trait Plugin: Send + Sync {
    /// Implementation name, usually the declared name the plugin's
    /// factory registers under.
    fn name(&self) -> &str;

    /// The version of the plugin implementation.
    fn version(&self) -> &str {
        "0.0.0"
    }

    /// Deterministic teardown hook.
    ///
    /// The orchestrator calls this exactly once before the instance is
    /// replaced or removed. Cleanup never relies on drop glue.
    fn on_unload(&self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Downcast escape hatch for broadcast operations that need the
    /// concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .field("version", &self.version())
            .finish()
    }
}
