use alloc::{string::String, vec::Vec};
use core::ops::Range;

use crate::ElementType;

/// A `[title](url)` link found at the start of a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkMatch {
    pub title: String,
    pub url: String,
    pub consumed: usize,
}

pub(crate) fn detect_link(window: &str) -> Option<LinkMatch> {
    let rest = window.strip_prefix('[')?;
    let title_end = rest.find(|c| matches!(c, ']' | '[' | '\n'))?;
    if !rest[title_end..].starts_with(']') {
        return None;
    }
    let after = rest[title_end + 1..].strip_prefix('(')?;
    let url_end = after.find(|c| matches!(c, ')' | '\n'))?;
    if url_end == 0 || !after[url_end..].starts_with(')') {
        return None;
    }

    Some(LinkMatch {
        title: rest[..title_end].into(),
        url: after[..url_end].into(),
        consumed: 1 + title_end + 2 + url_end + 1,
    })
}

/// True when `window` is a strict prefix of a link that may still complete.
pub(crate) fn might_be_link(window: &str) -> bool {
    let Some(rest) = window.strip_prefix('[') else {
        return false;
    };
    let Some(title_end) = rest.find(|c| matches!(c, ']' | '[' | '\n')) else {
        return true;
    };
    if !rest[title_end..].starts_with(']') {
        return false;
    }
    let after = &rest[title_end + 1..];
    if after.is_empty() {
        return true;
    }
    let Some(url) = after.strip_prefix('(') else {
        return false;
    };
    !url.contains(['\n', ')'])
}

/// Inline span styles recognised inside paragraph-like blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineKind {
    Strong,
    Emphasis,
    Strikethrough,
    Code,
}

impl InlineKind {
    pub(crate) const fn element_type(self) -> ElementType {
        match self {
            Self::Strong => ElementType::Strong,
            Self::Emphasis => ElementType::Emphasis,
            Self::Strikethrough => ElementType::Strikethrough,
            Self::Code => ElementType::InlineCode,
        }
    }

    fn from_run(marker: u8, run: usize) -> Option<Self> {
        match (marker, run) {
            (b'*', 1) => Some(Self::Emphasis),
            (b'*', 2) => Some(Self::Strong),
            (b'~', 2) => Some(Self::Strikethrough),
            (b'`', _) => Some(Self::Code),
            _ => None,
        }
    }
}

/// A resolved piece of paragraph text, as byte ranges into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Plain(Range<usize>),
    /// `end` is the offset just past the closing marker.
    Styled {
        kind: InlineKind,
        inner: Range<usize>,
        end: usize,
    },
}

/// Result of [`segment_inline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InlineScan {
    pub segments: Vec<Segment>,
    /// Bytes covered by `segments`; the rest must wait for more input.
    pub resolved: usize,
}

enum CloserSearch {
    Found(usize),
    Pending,
    Literal,
}

fn run_at(bytes: &[u8], at: usize) -> usize {
    bytes[at..].iter().take_while(|b| **b == bytes[at]).count()
}

fn find_closer(bytes: &[u8], from: usize, marker: u8, run: usize, closing: bool) -> CloserSearch {
    let flanked = marker != b'`';
    let mut at = from;
    while at < bytes.len() {
        match bytes[at] {
            b'\n' => return CloserSearch::Literal,
            b if b == marker => {
                let len = run_at(bytes, at);
                if at + len == bytes.len() && !closing {
                    return CloserSearch::Pending;
                }
                let after_space = bytes[at - 1] == b' ' || bytes[at - 1] == b'\t';
                if len == run && !(flanked && after_space) {
                    return CloserSearch::Found(at);
                }
                at += len;
            }
            _ => at += 1,
        }
    }
    if closing {
        CloserSearch::Literal
    } else {
        CloserSearch::Pending
    }
}

/// Splits paragraph text into plain and styled segments.
///
/// Openers are examined left to right and the first one with a closer on the
/// same line wins; everything before it becomes plain text, including any
/// opener that was still waiting for its own closer. Text from the first
/// undecided opener onward is left unresolved unless `closing` is set, in
/// which case undecided openers are literal.
pub(crate) fn segment_inline(text: &str, closing: bool) -> InlineScan {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut first_pending = None;
    let mut at = 0;

    while at < bytes.len() {
        let marker = bytes[at];
        if !matches!(marker, b'*' | b'~' | b'`') {
            at += 1;
            continue;
        }
        let run = run_at(bytes, at);
        let inner_start = at + run;
        if inner_start == bytes.len() && !closing {
            first_pending.get_or_insert(at);
            break;
        }
        let Some(kind) = InlineKind::from_run(marker, run) else {
            at = inner_start;
            continue;
        };
        let opens = inner_start < bytes.len()
            && (marker == b'`' || !matches!(bytes[inner_start], b' ' | b'\t' | b'\n'));
        if !opens {
            at = inner_start;
            continue;
        }
        match find_closer(bytes, inner_start, marker, run, closing) {
            CloserSearch::Found(close) => {
                if at > plain_start {
                    segments.push(Segment::Plain(plain_start..at));
                }
                segments.push(Segment::Styled {
                    kind,
                    inner: inner_start..close,
                    end: close + run,
                });
                at = close + run;
                plain_start = at;
                first_pending = None;
            }
            CloserSearch::Pending => {
                first_pending.get_or_insert(at);
                at = inner_start;
            }
            CloserSearch::Literal => at = inner_start,
        }
    }

    let resolved = first_pending.unwrap_or(bytes.len());
    if resolved > plain_start {
        segments.push(Segment::Plain(plain_start..resolved));
    }
    InlineScan {
        segments,
        resolved: resolved.max(plain_start),
    }
}
