use std::sync::Arc;

use tokio::sync::Mutex;

use crate::event::PluginFuture;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::repository::PluginRepository;
use crate::plugin_system::traits::Plugin;

/// Broadcasts operations over a stable snapshot of the repository.
///
/// The snapshot is taken once at call start: plugins registered or
/// unloaded while a broadcast runs are not visited. Invocations happen in
/// repository iteration order, one at a time; a failing invocation halts
/// the rest of the broadcast and propagates. Callers wanting isolation
/// catch inside their own operation.
#[derive(Clone)]
pub struct EventDispatcher {
    repository: Arc<Mutex<PluginRepository>>,
}

impl EventDispatcher {
    pub(crate) fn new(repository: Arc<Mutex<PluginRepository>>) -> Self {
        Self { repository }
    }

    /// Invoke `operation` once per registered plugin.
    pub async fn broadcast<F>(&self, mut operation: F) -> Result<(), PluginError>
    where
        F: FnMut(&dyn Plugin) -> Result<(), PluginError>,
    {
        let snapshot = self.repository.lock().await.snapshot();
        for (_, plugin) in &snapshot {
            operation(plugin.as_ref())?;
        }
        Ok(())
    }

    /// Invoke a suspending `operation` once per registered plugin.
    ///
    /// Each invocation is awaited to completion before the next begins,
    /// so per-plugin ordering matches [`broadcast`](Self::broadcast) and
    /// every snapshot member has completed by the time this returns.
    pub async fn broadcast_async<F>(&self, mut operation: F) -> Result<(), PluginError>
    where
        F: for<'a> FnMut(&'a dyn Plugin) -> PluginFuture<'a>,
    {
        let snapshot = self.repository.lock().await.snapshot();
        for (_, plugin) in &snapshot {
            operation(plugin.as_ref()).await?;
        }
        Ok(())
    }
}
