use alloc::string::String;

use crate::{ElementId, ElementType};

/// What kind of block is open, with the data its processor needs.
///
/// Headers and horizontal rules never appear here: they are complete as soon
/// as they are detected and are emitted in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Text,
    Quote,
    List { ordered: bool },
    Table,
    Math,
    Code,
}

/// An element that has been begun but not ended.
#[derive(Debug, Clone)]
pub(crate) struct BlockState {
    pub id: ElementId,
    pub kind: BlockKind,
    /// Raw text accumulated for the block, markers excluded.
    pub content: String,
    pub start_marker: String,
    /// Marker that closes the block; blocks without one close on a blank line.
    pub end_marker: Option<String>,
    /// Bytes of `content` already turned into deltas.
    pub flushed: usize,
    /// Transformed text emitted so far, nested spans included.
    pub emitted: String,
}

impl BlockState {
    pub(crate) fn new(
        id: ElementId,
        kind: BlockKind,
        start_marker: String,
        end_marker: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            content: String::new(),
            start_marker,
            end_marker,
            flushed: 0,
            emitted: String::new(),
        }
    }

    pub(crate) fn element_type(&self) -> ElementType {
        match self.kind {
            BlockKind::Text => ElementType::Text,
            BlockKind::Quote => ElementType::Quote,
            BlockKind::List { .. } => ElementType::List,
            BlockKind::Table => ElementType::Table,
            BlockKind::Math => ElementType::Math,
            BlockKind::Code => ElementType::Code,
        }
    }

    /// Length of the transformed content already reported.
    pub(crate) fn last_emitted_len(&self) -> usize {
        self.emitted.len()
    }

    /// Blocks without an explicit end marker close on a blank line or when a
    /// new block starts.
    pub(crate) fn is_paragraph_like(&self) -> bool {
        self.end_marker.is_none()
    }

    /// Whether `[title](url)` links and inline spans are recognised.
    pub(crate) fn has_inline_content(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Text | BlockKind::Quote | BlockKind::List { .. }
        )
    }

    /// Quotes, lists and tables report whole lines, so their content always
    /// ends with a newline once closed.
    pub(crate) fn needs_trailing_newline(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Quote | BlockKind::List { .. } | BlockKind::Table
        ) && !self.content.is_empty()
            && !self.content.ends_with('\n')
    }
}
