use std::fmt;

use serde::Serialize;

use crate::plugin_system::error::PluginError;
use crate::source::block::SourceBlock;
use crate::source::parser::Declaration;

/// Stable key for one plugin's registration slot.
///
/// Derived solely from the declared name in a block's header: two blocks
/// declaring the same name are the same plugin no matter how their bodies
/// differ. That invariant is what makes reload-by-identity work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PluginIdentity(String);

impl PluginIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve a block to its identity.
    ///
    /// Fails with [`PluginError::MalformedDeclaration`] when the header
    /// does not parse to a recognizable declared name. The body is never
    /// consulted.
    pub fn resolve(block: &SourceBlock) -> Result<Self, PluginError> {
        let declaration = block
            .declaration()
            .map_err(|source| PluginError::MalformedDeclaration { source })?;
        Ok(Self::from(&declaration))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Declaration> for PluginIdentity {
    fn from(declaration: &Declaration) -> Self {
        Self(declaration.name.clone())
    }
}

impl From<&str> for PluginIdentity {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for PluginIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
