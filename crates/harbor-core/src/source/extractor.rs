use crate::source::block::SourceBlock;
use crate::source::parser::DEFINITION_KEYWORD;

/// Lazily segments source text into [`SourceBlock`]s.
///
/// A column-0 line opening with the definition keyword starts a block,
/// flushing the one in progress. Indented lines (and interior blank
/// lines) continue the current block. Any other non-blank line closes the
/// current block without starting a new one, and whatever is in progress
/// at end of input is flushed.
///
/// Bodies are carried verbatim; the extractor tolerates anything that is
/// indented, well-formed or not.
#[derive(Debug, Clone)]
pub struct BlockExtractor<'a> {
    lines: std::str::Lines<'a>,
    current: Option<SourceBlock>,
}

impl<'a> BlockExtractor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            current: None,
        }
    }
}

/// Convenience constructor matching the iterator-adapter call style.
pub fn extract(text: &str) -> BlockExtractor<'_> {
    BlockExtractor::new(text)
}

fn is_definition_marker(line: &str) -> bool {
    line.strip_prefix(DEFINITION_KEYWORD)
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace()))
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

impl Iterator for BlockExtractor<'_> {
    type Item = SourceBlock;

    fn next(&mut self) -> Option<SourceBlock> {
        for line in self.lines.by_ref() {
            if is_definition_marker(line) {
                let finished = self.current.replace(SourceBlock::new(line.trim_end()));
                if finished.is_some() {
                    return finished;
                }
            } else if self.current.is_some() {
                if line.trim().is_empty() || is_indented(line) {
                    if let Some(block) = self.current.as_mut() {
                        block.push_body_line(line);
                    }
                } else {
                    // dedented, non-marker content closes the block
                    return self.current.take();
                }
            }
        }
        self.current.take()
    }
}
