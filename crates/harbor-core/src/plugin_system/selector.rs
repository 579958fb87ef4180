use std::fmt;
use std::sync::Arc;

use crate::source::block::SourceBlock;

/// Predicate deciding which candidate blocks a manager will instantiate.
///
/// Fixed at manager construction and consulted once per extracted block.
/// Rejection is silent: a non-matching block simply is not a plugin for
/// this manager.
#[derive(Clone, Default)]
pub enum CapabilitySelector {
    /// Every block is eligible; the first one wins.
    #[default]
    Any,
    /// Only blocks whose header declares this base/capability name.
    Base(String),
    /// Caller-supplied predicate over the whole block.
    Predicate(Arc<dyn Fn(&SourceBlock) -> bool + Send + Sync>),
}

impl CapabilitySelector {
    pub fn base(name: impl Into<String>) -> Self {
        Self::Base(name.into())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&SourceBlock) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Whether the block is eligible under this selector.
    ///
    /// For [`Base`](Self::Base), a header that does not parse is simply
    /// not a match; malformed headers only become errors once a block has
    /// actually been selected.
    pub fn accepts(&self, block: &SourceBlock) -> bool {
        match self {
            Self::Any => true,
            Self::Base(base) => block
                .declaration()
                .map(|declaration| declaration.declares_base(base))
                .unwrap_or(false),
            Self::Predicate(predicate) => predicate(block),
        }
    }

    /// The capability name this selector filters on, if any.
    pub fn capability(&self) -> Option<&str> {
        match self {
            Self::Base(base) => Some(base),
            _ => None,
        }
    }
}

impl fmt::Debug for CapabilitySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Base(base) => f.debug_tuple("Base").field(base).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
