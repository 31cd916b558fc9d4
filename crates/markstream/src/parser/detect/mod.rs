//! Pure recognisers for block and inline constructs.
//!
//! Every detector looks at a window of unconsumed input and either confirms a
//! construct or declines. Declining is only final when the matching
//! `might_be_*` predicate is also false: a `true` predicate means the window
//! is a strict prefix of a construct that may still complete, and the caller
//! has to wait for more input before deciding. Once the stream is closed the
//! predicates are no longer consulted and detectors accept constructs that
//! are terminated by the end of input instead of a newline.

mod block;
mod inline;
mod table;

use alloc::string::String;

pub(crate) use block::{LineClose, blank_line, match_closing_line, might_be_blank_line};
pub(crate) use inline::{Segment, detect_link, might_be_link, segment_inline};
pub(crate) use table::{TableMatch, render_row};

use crate::{ElementType, Metadata, TableOutputMode};

/// Outcome of running the block detectors at a line start.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Detection {
    /// A construct is confirmed.
    Match(BlockMatch),
    /// The window may still become a construct; more input is required.
    Wait,
    /// No construct starts here, whatever input follows.
    NoMatch,
}

/// A confirmed block start.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockMatch {
    /// The marker text as it appeared in the input (`"##"`, `` "```" ``, `"1."`).
    pub marker: String,
    /// Number of bytes of input the marker (not the body) occupies.
    pub consumed: usize,
    /// Marker that closes the block, for blocks not closed by a blank line.
    pub end_marker: Option<String>,
    pub start: BlockStart,
}

/// Construct-specific payload of a [`BlockMatch`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BlockStart {
    Header { level: u8, text: String },
    HorizontalRule { text: String },
    CodeFence(FenceInfo),
    Math,
    MathLine { text: String },
    Table(TableMatch),
    List(ListMarker),
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenceInfo {
    pub fence_char: char,
    pub fence_length: usize,
    pub info: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListMarker {
    pub ordered: bool,
    pub level: usize,
    pub start: Option<u64>,
}

impl BlockMatch {
    pub(crate) fn element_type(&self) -> ElementType {
        match self.start {
            BlockStart::Header { .. } => ElementType::Header,
            BlockStart::HorizontalRule { .. } => ElementType::HorizontalRule,
            BlockStart::CodeFence(_) => ElementType::Code,
            BlockStart::Math | BlockStart::MathLine { .. } => ElementType::Math,
            BlockStart::Table(_) => ElementType::Table,
            BlockStart::List(_) => ElementType::List,
            BlockStart::Quote => ElementType::Quote,
        }
    }

    pub(crate) fn metadata(&self) -> Option<Metadata> {
        match &self.start {
            BlockStart::Header { level, .. } => Some(Metadata::Header { level: *level }),
            BlockStart::CodeFence(fence) => Some(Metadata::Code {
                language: fence.language.clone(),
                info: fence.info.clone(),
                fence_char: fence.fence_char,
                fence_length: fence.fence_length,
            }),
            BlockStart::Math | BlockStart::MathLine { .. } => {
                Some(Metadata::Math { inline: false })
            }
            BlockStart::Table(table) => Some(Metadata::Table {
                alignments: table.alignments.clone(),
            }),
            BlockStart::List(list) => Some(Metadata::List {
                ordered: list.ordered,
                level: list.level,
                start: list.start,
            }),
            BlockStart::HorizontalRule { .. } | BlockStart::Quote => None,
        }
    }
}

/// Runs the block detectors in precedence order: code fence, table, math,
/// header, horizontal rule, list, quote.
///
/// The first detector that either matches or asks to wait decides the
/// outcome, so a more specific construct is never pre-empted by a less
/// specific one that happens to be recognisable earlier.
pub(crate) fn scan_block(window: &str, eof: bool, tables: TableOutputMode) -> Detection {
    let structured = tables == TableOutputMode::Structured;

    macro_rules! try_detector {
        ($detect:expr, $might_be:expr) => {
            if let Some(found) = $detect {
                return Detection::Match(found);
            }
            if !eof && $might_be {
                return Detection::Wait;
            }
        };
    }

    try_detector!(
        block::detect_code_fence(window, eof),
        block::might_be_code_fence(window)
    );
    try_detector!(
        table::detect_table(window, eof, structured),
        table::might_be_table(window, structured)
    );
    try_detector!(block::detect_math(window, eof), block::might_be_math(window));
    try_detector!(
        block::detect_header(window, eof),
        block::might_be_header(window)
    );
    try_detector!(
        block::detect_horizontal_rule(window, eof),
        block::might_be_horizontal_rule(window)
    );
    try_detector!(block::detect_list(window, eof), block::might_be_list(window));
    try_detector!(block::detect_quote(window), false);

    Detection::NoMatch
}

/// Splits off the first line of `window`.
///
/// Returns the line without its terminator and the number of bytes including
/// the terminator. A final unterminated line only counts once the stream is
/// closed.
pub(crate) fn complete_line(window: &str, eof: bool) -> Option<(&str, usize)> {
    match window.find('\n') {
        Some(end) => Some((&window[..end], end + 1)),
        None if eof && !window.is_empty() => Some((window, window.len())),
        None => None,
    }
}
