//! Turns accumulated block content into deltas.
//!
//! Flush decisions look only at the content of the block being flushed, never
//! at how the input was split into chunks. Together with character-by-character
//! accumulation this makes the delta sequence independent of chunking.

use alloc::{string::String, vec::Vec};

use super::{
    block::{BlockKind, BlockState},
    detect::{Segment, render_row, segment_inline},
    event_queue::EventQueue,
    state::IdGenerator,
};
use crate::{ElementType, InlineEmphasisMode, ParserOptions};

/// Splits plain text into word-sized pieces.
///
/// A run of newlines and a run of spaces each form one piece. A word is
/// emitted once a delimiter follows it, or once `terminated` says no more text
/// can follow. Words of `max_chars` characters or more are cut into pieces of
/// exactly `max_chars` characters.
///
/// Returns the pieces and the number of bytes they cover.
pub(crate) fn chunk_plain(text: &str, terminated: bool, max_chars: usize) -> (Vec<&str>, usize) {
    let mut pieces = Vec::new();
    let mut at = 0;

    while at < text.len() {
        let rest = &text[at..];
        let run_of = |c: u8| rest.bytes().take_while(|b| *b == c).count();
        let run = match rest.as_bytes()[0] {
            b'\n' => run_of(b'\n'),
            b' ' => run_of(b' '),
            _ => 0,
        };
        if run > 0 {
            pieces.push(&rest[..run]);
            at += run;
            continue;
        }

        let word_end = rest.find([' ', '\n']).unwrap_or(rest.len());
        if let Some((cut, _)) = rest[..word_end].char_indices().nth(max_chars) {
            pieces.push(&rest[..cut]);
            at += cut;
            continue;
        }
        let long_enough = rest[..word_end].chars().count() >= max_chars;
        if long_enough || word_end < rest.len() || terminated {
            pieces.push(&rest[..word_end]);
            at += word_end;
            continue;
        }
        break;
    }

    (pieces, at)
}

/// One unit of flushed output.
enum Piece {
    Text(String),
    Span { kind: ElementType, text: String },
}

/// Flushes whatever part of `block`'s unflushed content can be decided.
///
/// `closing` is set when the block is about to end, so that held-back words
/// and unmatched inline markers are released as plain text.
pub(crate) fn flush_block(
    block: &mut BlockState,
    closing: bool,
    options: &ParserOptions,
    ids: &mut IdGenerator,
    out: &mut EventQueue,
) {
    if block.kind == BlockKind::Code {
        return;
    }

    let pending = &block.content[block.flushed..];
    let window = match block.kind {
        BlockKind::List { .. } | BlockKind::Table if !closing => {
            pending.rfind('\n').map_or("", |end| &pending[..=end])
        }
        _ => pending,
    };
    let max = options.max_delta_chunk_size;

    let mut pieces = Vec::new();
    let consumed = match block.kind {
        BlockKind::Table => {
            for line in window.split_inclusive('\n') {
                let mut row = render_row(line.trim_end_matches('\n'));
                row.push('\n');
                let (chunks, _) = chunk_plain(&row, true, max);
                pieces.extend(chunks.into_iter().map(|chunk| Piece::Text(chunk.into())));
            }
            window.len()
        }
        BlockKind::Math => {
            let (chunks, consumed) = chunk_plain(window, closing, max);
            pieces.extend(chunks.into_iter().map(|chunk| Piece::Text(chunk.into())));
            consumed
        }
        _ => inline_pieces(window, closing, options, &mut pieces),
    };

    block.flushed += consumed;
    for piece in pieces {
        match piece {
            Piece::Text(text) => {
                block.emitted.push_str(&text);
                out.delta(block.id, text);
            }
            Piece::Span { kind, text } => {
                let id = ids.next_id();
                out.begin(kind, id, None);
                out.delta(id, text.as_str());
                block.emitted.push_str(&text);
                out.end(id, text);
            }
        }
    }
}

fn inline_pieces(
    window: &str,
    closing: bool,
    options: &ParserOptions,
    pieces: &mut Vec<Piece>,
) -> usize {
    let max = options.max_delta_chunk_size;
    let scan = segment_inline(window, closing);
    let resolved = scan.resolved;
    let last = scan.segments.len().saturating_sub(1);
    let mut consumed = 0;

    for (index, segment) in scan.segments.into_iter().enumerate() {
        match segment {
            Segment::Plain(range) => {
                let terminated = index < last || (closing && range.end == window.len());
                let (chunks, used) = chunk_plain(&window[range.clone()], terminated, max);
                pieces.extend(chunks.into_iter().map(|chunk| Piece::Text(chunk.into())));
                consumed = range.start + used;
                if used < range.len() {
                    break;
                }
            }
            Segment::Styled { kind, inner, end } => {
                let text = &window[inner.clone()];
                match options.inline_emphasis {
                    InlineEmphasisMode::Strip => {
                        let (chunks, _) = chunk_plain(text, true, max);
                        pieces.extend(chunks.into_iter().map(|chunk| Piece::Text(chunk.into())));
                    }
                    InlineEmphasisMode::Preserve => pieces.push(Piece::Span {
                        kind: kind.element_type(),
                        text: text.into(),
                    }),
                }
                consumed = end;
            }
        }
    }

    debug_assert!(consumed <= resolved);
    consumed
}
