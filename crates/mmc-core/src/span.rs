//! Source position tracking for error reporting.
//!
//! The external parser records a byte span for every node it creates. The
//! core never derives positions itself; it asks a [`PositionResolver`] only
//! when an error is rendered.

use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a location in source code (line, column, and byte offset).
///
/// Lines and columns are 1-based; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            offset: 0,
        }
    }

    #[must_use]
    pub const fn with_offset(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Represents a span of source code as a half-open byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps nodes to source locations.
pub trait PositionResolver {
    /// Returns the location where `node` starts, if known.
    fn resolve(&self, node: NodeId) -> Option<Location>;
}

impl PositionResolver for HashMap<NodeId, Location> {
    fn resolve(&self, node: NodeId) -> Option<Location> {
        self.get(&node).copied()
    }
}

/// A resolver that knows no positions, for contexts without source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositions;

impl PositionResolver for NoPositions {
    fn resolve(&self, _node: NodeId) -> Option<Location> {
        None
    }
}

/// Converts byte offsets into lines and columns of one source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: String,
    /// Byte offsets at which each line starts
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Indexes the line starts of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Returns the location of the byte `offset`.
    ///
    /// Returns `None` if the offset lies beyond the end of the text or inside a
    /// multi-byte character.
    #[must_use]
    pub fn location(&self, offset: usize) -> Option<Location> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.text[line_start..offset].chars().count() + 1;

        Some(Location::with_offset(line + 1, column, offset))
    }

    /// Returns the number of lines in the text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Token-position table handed over by the parser: node → byte span.
#[derive(Debug, Clone)]
pub struct PositionTable {
    spans: HashMap<NodeId, Span>,
    lines: LineIndex,
}

impl PositionTable {
    /// Creates an empty table for the given source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            spans: HashMap::new(),
            lines: LineIndex::new(source),
        }
    }

    /// Records the span of `node`, replacing an earlier record.
    pub fn record(&mut self, node: NodeId, span: Span) {
        self.spans.insert(node, span);
    }

    /// Looks up the recorded span of `node`.
    #[must_use]
    pub fn span(&self, node: NodeId) -> Option<Span> {
        self.spans.get(&node).copied()
    }
}

impl PositionResolver for PositionTable {
    fn resolve(&self, node: NodeId) -> Option<Location> {
        let span = self.spans.get(&node)?;
        self.lines.location(span.start)
    }
}
