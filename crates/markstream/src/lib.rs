//! Streaming markdown parser for text that arrives a few characters at a
//! time, such as the output of a language model.
//!
//! Feed fragments to a [`StreamingParser`] and it reports the document as a
//! stream of [`ParseEvent`]s: `begin` when an element is recognised, `delta`
//! as its content becomes known, `end` with the final content, and
//! `annotation` for links found inside it. Ambiguous input is held back
//! until it can be decided, so the events are the same however the document
//! is split into fragments.
//!
//! ```rust
//! use markstream::{ElementType, ParseEvent, ParserOptions, StreamingParser};
//!
//! let mut parser = StreamingParser::new(ParserOptions::default());
//! let mut events: Vec<ParseEvent> = Vec::new();
//! for fragment in ["```py", "thon\nprint(1)\n", "```\n"] {
//!     events.extend(parser.feed(fragment));
//! }
//! events.extend(parser.finish());
//!
//! assert!(matches!(
//!     events.first(),
//!     Some(ParseEvent::Begin { element_type: ElementType::Code, .. })
//! ));
//! assert!(matches!(
//!     events.last(),
//!     Some(ParseEvent::End { final_content, .. }) if final_content == "print(1)"
//! ));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod chunk_utils;
mod event;
mod parser;

#[cfg(test)]
mod tests;

pub use event::{
    Alignment, Annotation, ElementId, ElementSummary, ElementType, Metadata, ParseEvent,
    StreamViolation, check_well_formed, summarize,
};
pub use parser::{
    ClosedStreamingParser, DEFAULT_MAX_DELTA_CHUNK_SIZE, FeedIter, InlineEmphasisMode,
    ParseOptionError, ParserOptions, StreamingParser, TableOutputMode,
};
