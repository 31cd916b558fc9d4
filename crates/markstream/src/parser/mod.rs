//! Incremental markdown parser.
//!
//! Overview
//! - Input arrives in arbitrary fragments through [`StreamingParser::feed`].
//!   Fragments are appended to one buffer and consumed left to right; consumed
//!   input is never re-scanned except for the small look-ahead windows the
//!   detectors need at a line start.
//! - The driver runs one *step* at a time. A step either consumes input and
//!   queues zero or more events, or reports that the next decision depends on
//!   input that has not arrived yet. Events are handed out lazily: iterating
//!   the value returned by `feed` runs steps only until the next event is
//!   available.
//! - While a fenced code block is open, the code processor owns the stream
//!   and nothing inside the fence is interpreted. Otherwise the block
//!   processor detects new blocks at line starts and accumulates text into the
//!   open block.
//!
//! Chunking
//! - Text enters blocks one character per step and every flush decision
//!   depends only on the block's own content. A construct that is ambiguous
//!   at the end of the available input (a lone `#`, a `|` that may start a
//!   table, an unterminated `[link`) makes the step wait instead of guessing.
//!   The resulting event sequence, delta boundaries included, is therefore
//!   the same however the input is split.
//!
//! Completion
//! - [`StreamingParser::finish`] consumes the parser. Pending ambiguities are
//!   resolved as "no more input", held-back text is released and every open
//!   element is ended, innermost first.

mod block;
mod blocks;
mod chunker;
mod code;
mod detect;
mod detected;
mod error;
mod event_queue;
mod options;
mod state;

pub use error::ParseOptionError;
use event_queue::EventQueue;
pub use options::{
    DEFAULT_MAX_DELTA_CHUNK_SIZE, InlineEmphasisMode, ParserOptions, TableOutputMode,
};
use state::ParserState;

use crate::ParseEvent;

/// Result of running one parser step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Input was consumed; events may have been queued.
    Progress,
    /// The next decision needs input that has not arrived yet.
    NeedInput,
}

impl ParserState {
    fn step(&mut self, out: &mut EventQueue) -> Step {
        if self.tail().is_empty() {
            return Step::NeedInput;
        }
        if self.open_fence().is_some() {
            self.process_code_block(out)
        } else {
            self.process_blocks(out)
        }
    }
}

/// The streaming markdown parser.
///
/// `StreamingParser` is fed fragments of a markdown document, such as the
/// tokens of an LLM response, and reports the document structure as a
/// sequence of [`ParseEvent`]s while the text is still arriving.
///
/// # Examples
///
/// ```rust
/// use markstream::{ParseEvent, ParserOptions, StreamingParser};
///
/// let mut parser = StreamingParser::new(ParserOptions::default());
/// let mut events = Vec::new();
/// for token in ["# Str", "eaming\n\nHello ", "wor", "ld"] {
///     events.extend(parser.feed(token));
/// }
/// events.extend(parser.finish());
///
/// let text: String = events
///     .iter()
///     .filter_map(|event| match event {
///         ParseEvent::Delta { content, .. } => Some(content.as_str()),
///         _ => None,
///     })
///     .collect();
/// assert_eq!(text, "StreamingHello world");
/// ```
#[derive(Debug)]
pub struct StreamingParser {
    state: ParserState,
    events: EventQueue,
    finished: bool,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl StreamingParser {
    /// Creates a new `StreamingParser` with the given options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use markstream::{ParserOptions, StreamingParser, TableOutputMode};
    ///
    /// let parser = StreamingParser::new(ParserOptions {
    ///     table_output: TableOutputMode::Structured,
    ///     ..Default::default()
    /// });
    /// ```
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            state: ParserState::new(options),
            events: EventQueue::new(),
            finished: false,
        }
    }

    /// The options this parser was created with, after normalisation.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.state.options
    }

    /// Feeds a fragment of markdown and returns the events it makes
    /// available.
    ///
    /// The returned iterator is lazy. Dropping it before it is exhausted is
    /// allowed: the remaining work is picked up by the next call to `feed`
    /// or by [`finish`](Self::finish).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use markstream::{ParserOptions, StreamingParser};
    /// let mut parser = StreamingParser::new(ParserOptions::default());
    /// // A lone `#` may still become a header, so nothing is reported yet.
    /// assert_eq!(parser.feed("#").count(), 0);
    /// assert_eq!(parser.feed(" Title\n").count(), 3);
    /// ```
    pub fn feed(&mut self, fragment: &str) -> FeedIter<'_> {
        self.state.compact();
        self.state.buffer.push_str(fragment);
        tracing::trace!(
            bytes = fragment.len(),
            position = self.state.position(),
            "fed fragment"
        );
        FeedIter { parser: self }
    }

    /// Marks the end of input and returns an iterator over the remaining
    /// events.
    ///
    /// Every construct still waiting for input is decided, held-back text is
    /// flushed and every open element is ended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use markstream::{ParseEvent, ParserOptions, StreamingParser};
    ///
    /// let mut parser = StreamingParser::new(ParserOptions::default());
    /// parser.feed("```\nfn main() {}").for_each(drop);
    /// let last = parser.finish().last();
    /// assert!(matches!(
    ///     last,
    ///     Some(ParseEvent::End { final_content, .. }) if final_content == "fn main() {}"
    /// ));
    /// ```
    #[must_use]
    pub fn finish(mut self) -> ClosedStreamingParser {
        self.state.end_of_input = true;
        ClosedStreamingParser { parser: self }
    }

    fn next_event(&mut self) -> Option<ParseEvent> {
        loop {
            if let Some(event) = self.events.pop() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            match self.state.step(&mut self.events) {
                Step::Progress => {}
                Step::NeedInput if self.state.end_of_input => {
                    self.state.close_all(&mut self.events);
                    self.finished = true;
                    tracing::debug!(position = self.state.position(), "stream finished");
                }
                Step::NeedInput => {
                    tracing::trace!(position = self.state.position(), "waiting for input");
                    return None;
                }
            }
        }
    }

    /// Number of events produced but not yet pulled.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    #[must_use]
    pub fn queued_events(&self) -> usize {
        self.events.len()
    }
}

/// Events made available by one call to [`StreamingParser::feed`].
#[derive(Debug)]
pub struct FeedIter<'p> {
    parser: &'p mut StreamingParser,
}

impl Iterator for FeedIter<'_> {
    type Item = ParseEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.parser.next_event()
    }
}

/// A [`StreamingParser`] that has been closed to further input.
///
/// Returned by [`StreamingParser::finish`]. It yields the remaining events
/// and then ends.
#[derive(Debug)]
pub struct ClosedStreamingParser {
    parser: StreamingParser,
}

impl Iterator for ClosedStreamingParser {
    type Item = ParseEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.parser.next_event()
    }
}

impl core::iter::FusedIterator for ClosedStreamingParser {}
