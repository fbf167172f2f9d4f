//! In-memory editing surface.
//!
//! [`Document`] keeps content as a list of runs and implements [`Host`], so it
//! can drive [`attach`](crate::fragment::attach) without a real editor.
//! Positions and lengths are counted in characters. Fragment and tag runs are
//! atomic: a range may cover them completely but never split them.

use crate::fragment::{detach, AnnotatedNode, Host, Range};
use crate::tags::find_trailing_tag;
use crate::types::{Delta, FragmentAnnotation, Operation, Tag};
use crate::{Error, Result};

/// A run of document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Text(String),
    Fragment(AnnotatedNode),
    Tag(Tag),
}

impl Run {
    fn text(&self) -> &str {
        match self {
            Run::Text(text) => text,
            Run::Fragment(node) => node.text(),
            Run::Tag(tag) => &tag.text,
        }
    }

    fn len(&self) -> usize {
        self.text().chars().count()
    }
}

/// A single-writer document with a selection.
#[derive(Debug, Clone, Default)]
pub struct Document {
    runs: Vec<Run>,
    selection: Option<Range>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding plain text.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.runs.push(Run::Text(text.to_string()));
        doc.normalize();
        doc
    }

    /// Load a document from an operation list.
    ///
    /// Fragments are stored as annotated nodes and read back through
    /// [`detach`], so an effect outside the known catalogue comes back
    /// from [`Document::operations`] as `fade-in`.
    pub fn from_operations(ops: &[Operation]) -> Self {
        let mut doc = Self::new();
        for op in ops {
            let run = match op {
                Operation::TextInsert { content } => Run::Text(content.clone()),
                Operation::AnnotatedInsert { annotation } => Run::Fragment(annotation.to_node()),
                Operation::TagInsert { tag } => Run::Tag(tag.clone()),
            };
            doc.runs.push(run);
        }
        doc.normalize();
        doc
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// The whole document as plain text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    /// Select a range.
    pub fn select(&mut self, index: usize, length: usize) {
        self.selection = Some(Range::new(index, length));
    }

    /// Drop the selection, as when the editor loses focus.
    pub fn blur(&mut self) {
        self.selection = None;
    }

    /// Insert plain text at `index`.
    pub fn insert_text(&mut self, index: usize, text: &str) -> Result<()> {
        self.replace_range(Range::new(index, 0), Some(Run::Text(text.to_string())))?;
        Ok(())
    }

    /// Delete a range, including any fragments or tags it covers.
    pub fn delete(&mut self, range: Range) -> Result<()> {
        self.replace_range(range, None)?;
        Ok(())
    }

    /// Type text at the caret, replacing the selection.
    ///
    /// Typing a single whitespace character right after a hashtag turns the
    /// hashtag into a tag.
    pub fn type_text(&mut self, text: &str) -> Result<Option<Tag>> {
        let range = self
            .selection
            .unwrap_or_else(|| Range::new(self.len(), 0));

        self.replace_range(range, Some(Run::Text(text.to_string())))?;
        let caret = range.index + text.chars().count();
        self.set_selection(caret);

        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_whitespace() => self.convert_trailing_tag(caret),
            _ => Ok(None),
        }
    }

    /// Turn a hashtag ending just before `caret` into a tag.
    ///
    /// The line must end in `#word` plus one whitespace character at `caret`.
    /// The whitespace is replaced by a space after the tag, and the caret is
    /// left after that space.
    pub fn convert_trailing_tag(&mut self, caret: usize) -> Result<Option<Tag>> {
        let before = self.text(Range::new(0, caret))?;
        let line_start = before
            .rfind('\n')
            .map(|pos| before[..=pos].chars().count())
            .unwrap_or(0);
        let line = self.text(Range::new(line_start, caret - line_start))?;

        let found = match find_trailing_tag(&line) {
            Some(found) => found,
            None => return Ok(None),
        };

        let range = Range::new(line_start + found.start, found.replaced_len());
        if !self.is_plain_text(range) {
            return Ok(None);
        }

        let tag = found.to_tag();
        let tag_len = tag.text.chars().count();
        self.replace_range(range, Some(Run::Tag(tag.clone())))?;
        self.insert_text(range.index + tag_len, " ")?;
        self.set_selection(range.index + tag_len + 1);

        log::debug!("Converted hashtag {} into tag {}", tag.text, tag.id);
        Ok(Some(tag))
    }

    /// Remove fragment formatting from the run at `position`, keeping its text.
    pub fn clear_fragment(&mut self, position: usize) -> Option<FragmentAnnotation> {
        let mut offset = 0;
        for i in 0..self.runs.len() {
            let len = self.runs[i].len();
            if position >= offset && position < offset + len {
                let text = match &self.runs[i] {
                    Run::Fragment(node) => node.text().to_string(),
                    _ => return None,
                };
                let old = std::mem::replace(&mut self.runs[i], Run::Text(text));
                self.normalize();
                return match old {
                    Run::Fragment(node) => Some(detach(&node)),
                    _ => None,
                };
            }
            offset += len;
        }
        None
    }

    /// Content as an operation list, reading fragments back from their runs.
    pub fn operations(&self) -> Vec<Operation> {
        self.runs
            .iter()
            .map(|run| match run {
                Run::Text(text) => Operation::text(text.as_str()),
                Run::Fragment(node) => Operation::fragment(detach(node)),
                Run::Tag(tag) => Operation::tag(tag.clone()),
            })
            .collect()
    }

    /// Content as a delta.
    pub fn to_delta(&self) -> Delta {
        Delta::new(self.operations())
    }

    /// All fragments in document order.
    pub fn fragments(&self) -> Vec<FragmentAnnotation> {
        self.runs
            .iter()
            .filter_map(|run| match run {
                Run::Fragment(node) => Some(detach(node)),
                _ => None,
            })
            .collect()
    }

    fn is_plain_text(&self, range: Range) -> bool {
        let mut offset = 0;
        for run in &self.runs {
            let len = run.len();
            let overlaps = offset < range.end() && range.index < offset + len;
            if overlaps && !matches!(run, Run::Text(_)) {
                return false;
            }
            offset += len;
        }
        true
    }

    fn check_range(&self, range: Range) -> Result<()> {
        let len = self.len();
        if range.end() > len {
            return Err(Error::InvalidRange(format!(
                "{}..{} is outside the document (length {})",
                range.index,
                range.end(),
                len
            )));
        }
        Ok(())
    }

    /// Replace `range` with `run` in one step, returning the removed runs.
    fn replace_range(&mut self, range: Range, run: Option<Run>) -> Result<Vec<Run>> {
        self.check_range(range)?;

        let bounds = self
            .split_at(range.index)
            .and_then(|start| self.split_at(range.end()).map(|end| (start, end)));
        let (start, end) = match bounds {
            Ok(bounds) => bounds,
            Err(e) => {
                self.normalize();
                return Err(e);
            }
        };

        let removed = self.runs.splice(start..end, run).collect();
        self.normalize();
        Ok(removed)
    }

    /// Ensure a run boundary at `position` and return the index of the run
    /// starting there.
    fn split_at(&mut self, position: usize) -> Result<usize> {
        let mut offset = 0;
        for i in 0..self.runs.len() {
            if offset == position {
                return Ok(i);
            }
            let len = self.runs[i].len();
            if position < offset + len {
                if let Run::Text(text) = &mut self.runs[i] {
                    let byte = text
                        .char_indices()
                        .nth(position - offset)
                        .map(|(b, _)| b)
                        .unwrap_or(text.len());
                    let tail = text.split_off(byte);
                    self.runs.insert(i + 1, Run::Text(tail));
                    return Ok(i + 1);
                }
                return Err(Error::InvalidRange(format!(
                    "position {} splits an atomic run",
                    position
                )));
            }
            offset += len;
        }

        if offset == position {
            Ok(self.runs.len())
        } else {
            Err(Error::InvalidRange(format!(
                "position {} is outside the document (length {})",
                position, offset
            )))
        }
    }

    /// Merge adjacent text runs and drop empty ones.
    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if let Run::Text(text) = &run {
                if text.is_empty() {
                    continue;
                }
                if let Some(Run::Text(prev)) = merged.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }
}

impl Host for Document {
    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn text(&self, range: Range) -> Result<String> {
        self.check_range(range)?;
        Ok(self
            .runs
            .iter()
            .flat_map(|run| run.text().chars())
            .skip(range.index)
            .take(range.length)
            .collect())
    }

    fn format_range(&mut self, range: Range, annotation: &FragmentAnnotation) -> Result<()> {
        self.replace_range(range, Some(Run::Fragment(annotation.to_node())))?;
        Ok(())
    }

    fn set_selection(&mut self, position: usize) {
        self.selection = Some(Range::new(position.min(self.len()), 0));
    }
}
