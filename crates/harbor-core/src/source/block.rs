use crate::source::error::SourceError;
use crate::source::parser::{self, Declaration};

/// One structural unit extracted from plugin source text: the header line
/// declaring an implementation, plus the indented lines underneath it.
///
/// Blocks are ephemeral: they exist for the duration of a single load
/// operation and are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    header: String,
    body: Vec<String>,
}

impl SourceBlock {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: Vec::new(),
        }
    }

    pub(crate) fn push_body_line(&mut self, line: &str) {
        self.body.push(line.to_string());
    }

    /// The raw header line, unparsed.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The raw body lines, in order, including interior blank lines.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Parse the header into a [`Declaration`]. The body is never
    /// consulted.
    pub fn declaration(&self) -> Result<Declaration, SourceError> {
        parser::parse_declaration(&self.header)
    }

    /// Body lines that carry content.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .map(|line| line.as_str())
            .filter(|line| !line.trim().is_empty())
    }
}
