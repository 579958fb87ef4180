//! Broadcasting caller-supplied operations to every registered plugin.
pub mod dispatcher;

use std::future::Future;
use std::pin::Pin;

use crate::plugin_system::error::PluginError;

/// Owned future returned by an asynchronous broadcast operation.
pub type PluginFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>>;

pub use dispatcher::EventDispatcher;

#[cfg(test)]
mod tests;
