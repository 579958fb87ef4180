//! harbor-core: a runtime plugin manager.
//!
//! Source text is segmented into candidate declaration blocks, one block
//! is selected by capability, its declared name becomes the plugin's
//! stable identity, and a registered factory constructs the live instance
//! kept in the repository. Loads are atomic, teardown is deterministic,
//! and events broadcast over stable repository snapshots.
pub mod event;
pub mod plugin_system;
pub mod source;

pub use event::{EventDispatcher, PluginFuture};
pub use plugin_system::{
    CapabilitySelector, DefaultPluginManager, FactoryCatalog, LoadFailure, Plugin, PluginError,
    PluginFactory, PluginIdentity, PluginInfo, PluginManager, PluginRepository,
};
pub use source::{BlockExtractor, Declaration, SourceBlock};
