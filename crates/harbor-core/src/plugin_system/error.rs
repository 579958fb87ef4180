//! Errors surfaced by plugin lifecycle operations.
//!
//! [`PluginError`] is the single caller-facing enum; compile-time and
//! construction-time failures share the `Loading` kind and are told apart
//! through the attached [`LoadFailure`] cause, never through different
//! top-level kinds.
use std::path::PathBuf;

use thiserror::Error;

use crate::source::error::SourceError;

#[derive(Debug, Error)]
pub enum PluginError {
    /// A selected block's header carries no recognizable declared name.
    #[error("malformed plugin declaration: {source}")]
    MalformedDeclaration {
        #[source]
        source: SourceError,
    },

    /// Compiling or constructing the selected block failed. The original
    /// failure is preserved as the source so callers can distinguish
    /// malformed source from a failing constructor.
    #[error("plugin loading failed for '{declared_name}': {source}")]
    Loading {
        declared_name: String,
        #[source]
        source: Box<LoadFailure>,
    },

    /// No block in the text satisfied the capability selector.
    #[error("no eligible plugin block in source (capability filter: {filter})",
        filter = .capability.as_deref().unwrap_or("<none>"))]
    NoEligibleCandidate { capability: Option<String> },

    /// Resolving a source location to text failed. This originates in the
    /// acquisition collaborator, not the lifecycle core.
    #[error("failed to acquire plugin source from '{}': {source}", path.display())]
    Acquisition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A teardown hook failed. The registry entry is already gone by the
    /// time this is reported.
    #[error("teardown hook failed for plugin '{plugin_id}': {message}")]
    Teardown { plugin_id: String, message: String },

    /// A broadcast operation failed against one plugin; the remainder of
    /// the broadcast was abandoned.
    #[error("operation failed against plugin '{plugin_id}': {message}")]
    Operation { plugin_id: String, message: String },

    /// The factory catalog rejected a registration.
    #[error("factory registration rejected for '{declared_name}': {message}")]
    Registration {
        declared_name: String,
        message: String,
    },
}

/// The underlying cause of a [`PluginError::Loading`].
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// The block body failed the structural member grammar.
    #[error(transparent)]
    Syntax(#[from] SourceError),

    /// The declared name resolves to no registered factory.
    #[error("no factory registered under declared name '{0}'")]
    UnresolvedName(String),

    /// The factory's constructor failed.
    #[error("constructor failed: {0}")]
    Construction(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PluginError>;
