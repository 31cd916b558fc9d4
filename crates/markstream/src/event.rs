//! Events emitted by the streaming markdown parser.
//!
//! A consumer tracks open elements by [`ElementId`]: a [`ParseEvent::Begin`]
//! opens an element, [`ParseEvent::Delta`] appends content to it,
//! [`ParseEvent::End`] finalizes it, and [`ParseEvent::Annotation`] attaches
//! extra information to an element that is still open.
//!
//! # Examples
//!
//! ```
//! use markstream::{ElementId, ElementType, Metadata, ParseEvent, ParserOptions, StreamingParser};
//!
//! let mut parser = StreamingParser::new(ParserOptions::default());
//! let mut events: Vec<ParseEvent> = parser.feed("# Hello\n").collect();
//! events.extend(parser.finish());
//! assert_eq!(
//!     events,
//!     vec![
//!         ParseEvent::Begin {
//!             element_type: ElementType::Header,
//!             element_id: ElementId::new(1),
//!             metadata: Some(Metadata::Header { level: 1 }),
//!         },
//!         ParseEvent::Delta {
//!             element_id: ElementId::new(1),
//!             content: "Hello".to_string(),
//!         },
//!         ParseEvent::End {
//!             element_id: ElementId::new(1),
//!             final_content: "Hello".to_string(),
//!         },
//!     ]
//! );
//! ```
use alloc::{string::String, vec::Vec};
use core::fmt;

/// Identifier of one element in the event stream.
///
/// Ids are handed out by a monotonically increasing counter owned by a single
/// parser; every element receives exactly one id.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of element opened by a [`ParseEvent::Begin`].
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// ATX heading (`# Title`).
    Header,
    /// Fenced code block.
    Code,
    /// Block quote (`> text`).
    Quote,
    /// Ordered or unordered list.
    List,
    /// Pipe table.
    Table,
    /// Display math (`$$ ... $$`).
    Math,
    /// Thematic break (`---`).
    HorizontalRule,
    /// Implicit paragraph.
    Text,
    /// `**strong**` span.
    Strong,
    /// `*emphasis*` span.
    Emphasis,
    /// `~~strikethrough~~` span.
    Strikethrough,
    /// `` `code` `` span.
    InlineCode,
    /// Header section of a structured table.
    Thead,
    /// Body section of a structured table.
    Tbody,
    /// One row of a structured table.
    Row,
    /// One cell of a structured table.
    Col,
}

impl ElementType {
    /// Returns the lower-case name used in serialized event streams.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::List => "list",
            Self::Table => "table",
            Self::Math => "math",
            Self::HorizontalRule => "horizontal_rule",
            Self::Text => "text",
            Self::Strong => "strong",
            Self::Emphasis => "emphasis",
            Self::Strikethrough => "strikethrough",
            Self::InlineCode => "inline_code",
            Self::Thead => "thead",
            Self::Tbody => "tbody",
            Self::Row => "row",
            Self::Col => "col",
        }
    }

    /// Whether this element is a block-level construct.
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(
            self,
            Self::Header
                | Self::Code
                | Self::Quote
                | Self::List
                | Self::Table
                | Self::Math
                | Self::HorizontalRule
                | Self::Text
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal alignment of a table column, taken from the separator row.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Alignment {
    /// `---`
    #[default]
    None,
    /// `:---`
    Left,
    /// `:---:`
    Center,
    /// `---:`
    Right,
}

/// Element-specific metadata carried by [`ParseEvent::Begin`].
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadata {
    /// Heading level, 1 through 6.
    Header {
        /// Number of leading `#` characters.
        level: u8,
    },
    /// Fence information of a code block.
    Code {
        /// First word of the info string, if any.
        language: Option<String>,
        /// Full info string after the opening fence, trimmed.
        info: String,
        /// The fence character, `` ` `` or `~`.
        fence_char: char,
        /// Number of fence characters in the opening fence.
        fence_length: usize,
    },
    /// List shape.
    List {
        /// `true` for `1.` style lists.
        ordered: bool,
        /// Nesting level derived from the indentation of the first item.
        level: usize,
        /// Number of the first item of an ordered list.
        start: Option<u64>,
    },
    /// Math block flavour.
    Math {
        /// Always `false` for block math recognised at a line start.
        inline: bool,
    },
    /// Column alignments of a table.
    Table {
        /// One entry per column.
        alignments: Vec<Alignment>,
    },
    /// A structured table cell.
    Col {
        /// Alignment of the column this cell belongs to.
        alignment: Alignment,
        /// Whether the cell belongs to the header row.
        header: bool,
    },
}

/// Extra information attached to an open element.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// An inline `[title](url)` link.
    UrlCitation {
        /// Link text.
        title: String,
        /// Link destination.
        url: String,
        /// Byte offset of the opening `[` in the input stream.
        start_index: usize,
        /// Byte offset just past the closing `)` in the input stream.
        end_index: usize,
    },
}

/// An event generated by the streaming markdown parser.
///
/// # Examples
///
/// ```
/// use markstream::{ElementId, ParseEvent};
///
/// let evt = ParseEvent::Delta { element_id: ElementId::new(3), content: "hi".into() };
/// assert_eq!(evt.element_id(), ElementId::new(3));
/// ```
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// An element was opened.
    Begin {
        /// What kind of element was opened.
        element_type: ElementType,
        /// Id used by every later event for this element.
        element_id: ElementId,
        /// Element-specific metadata, if the element carries any.
        #[cfg_attr(
            any(test, feature = "serde"),
            serde(skip_serializing_if = "Option::is_none", default)
        )]
        metadata: Option<Metadata>,
    },
    /// New content for an open element.
    Delta {
        /// The element receiving the content.
        element_id: ElementId,
        /// Content to append.
        content: String,
    },
    /// An element was closed.
    End {
        /// The element being closed.
        element_id: ElementId,
        /// The complete content of the element.
        final_content: String,
    },
    /// Extra information for an open element.
    Annotation {
        /// The element being annotated.
        element_id: ElementId,
        /// The annotation payload.
        annotation: Annotation,
    },
}

impl ParseEvent {
    /// Returns the id of the element this event refers to.
    #[must_use]
    pub fn element_id(&self) -> ElementId {
        match self {
            Self::Begin { element_id, .. }
            | Self::Delta { element_id, .. }
            | Self::End { element_id, .. }
            | Self::Annotation { element_id, .. } => *element_id,
        }
    }
}

// One line per event, used by snapshot tests and the demo.
impl fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin {
                element_type,
                element_id,
                metadata: Some(metadata),
            } => write!(f, "begin {element_id} {element_type} {metadata:?}"),
            Self::Begin {
                element_type,
                element_id,
                metadata: None,
            } => write!(f, "begin {element_id} {element_type}"),
            Self::Delta {
                element_id,
                content,
            } => write!(f, "delta {element_id} {content:?}"),
            Self::End {
                element_id,
                final_content,
            } => write!(f, "end {element_id} {final_content:?}"),
            Self::Annotation {
                element_id,
                annotation,
            } => write!(f, "annotation {element_id} {annotation:?}"),
        }
    }
}

/// Reconstructed state of one element, used to compare event streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSummary {
    /// Kind of the element.
    pub element_type: ElementType,
    /// Id of the enclosing element, if any.
    pub parent: Option<ElementId>,
    /// Concatenation of the element's own deltas.
    pub deltas: String,
    /// `final_content` of the closing event, if the element was closed.
    pub final_content: Option<String>,
    /// Annotations attached to the element, in order.
    pub annotations: Vec<Annotation>,
}

/// Folds an event stream into one [`ElementSummary`] per element, in opening
/// order.
///
/// Elements are nested when one is opened while another is still open. Events
/// for unknown ids are ignored; use [`check_well_formed`] to detect them.
#[must_use]
pub fn summarize(events: &[ParseEvent]) -> Vec<(ElementId, ElementSummary)> {
    let mut out: Vec<(ElementId, ElementSummary)> = Vec::new();
    let mut open: Vec<ElementId> = Vec::new();

    for event in events {
        match event {
            ParseEvent::Begin {
                element_type,
                element_id,
                ..
            } => {
                out.push((
                    *element_id,
                    ElementSummary {
                        element_type: *element_type,
                        parent: open.last().copied(),
                        deltas: String::new(),
                        final_content: None,
                        annotations: Vec::new(),
                    },
                ));
                open.push(*element_id);
            }
            ParseEvent::Delta {
                element_id,
                content,
            } => {
                if let Some((_, summary)) = out.iter_mut().rev().find(|(id, _)| id == element_id) {
                    summary.deltas.push_str(content);
                }
            }
            ParseEvent::End {
                element_id,
                final_content,
            } => {
                if let Some((_, summary)) = out.iter_mut().rev().find(|(id, _)| id == element_id) {
                    summary.final_content = Some(final_content.clone());
                }
                open.retain(|id| id != element_id);
            }
            ParseEvent::Annotation {
                element_id,
                annotation,
            } => {
                if let Some((_, summary)) = out.iter_mut().rev().find(|(id, _)| id == element_id) {
                    summary.annotations.push(annotation.clone());
                }
            }
        }
    }

    out
}

/// Ways in which an event stream can violate the begin/delta/end contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamViolation {
    /// An id was opened twice.
    #[error("element {0} opened twice")]
    DuplicateBegin(ElementId),
    /// An event referenced an element that is not open.
    #[error("event for element {0} which is not open")]
    NotOpen(ElementId),
    /// An element was still open when the stream ended.
    #[error("element {0} was never closed")]
    Unclosed(ElementId),
}

/// Checks that every `begin` has exactly one matching `end` and that no event
/// references an element which is not open.
///
/// # Errors
///
/// Returns the first [`StreamViolation`] found.
pub fn check_well_formed(events: &[ParseEvent]) -> Result<(), StreamViolation> {
    let mut seen: Vec<ElementId> = Vec::new();
    let mut open: Vec<ElementId> = Vec::new();

    for event in events {
        let id = event.element_id();
        match event {
            ParseEvent::Begin { .. } => {
                if seen.contains(&id) {
                    return Err(StreamViolation::DuplicateBegin(id));
                }
                seen.push(id);
                open.push(id);
            }
            ParseEvent::Delta { .. } | ParseEvent::Annotation { .. } => {
                if !open.contains(&id) {
                    return Err(StreamViolation::NotOpen(id));
                }
            }
            ParseEvent::End { .. } => {
                let Some(pos) = open.iter().position(|open_id| *open_id == id) else {
                    return Err(StreamViolation::NotOpen(id));
                };
                open.remove(pos);
            }
        }
    }

    match open.first() {
        Some(id) => Err(StreamViolation::Unclosed(*id)),
        None => Ok(()),
    }
}
