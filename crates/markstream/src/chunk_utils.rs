//! Helpers for splitting a document into fragments, used by tests, fuzzing
//! and benchmarks to simulate streamed input.

use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks without
/// breaking UTF-8 code points.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Split `payload` into fragments of `chars` characters each, the last one
/// possibly shorter. This mimics a model emitting a few characters per
/// token.
///
/// # Panics
///
/// Panics if `chars` is zero.
#[must_use]
pub fn produce_fixed_chunks(payload: &str, chars: usize) -> Vec<&str> {
    assert!(chars > 0);
    let mut chunks = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let end = rest.char_indices().nth(chars).map_or(rest.len(), |(at, _)| at);
        chunks.push(&rest[..end]);
        rest = &rest[end..];
    }
    chunks
}

/// Split `payload` at the given byte offsets, skipping offsets that are out
/// of range, out of order or inside a UTF-8 code point.
#[must_use]
pub fn split_at_offsets<'a>(payload: &'a str, offsets: &[usize]) -> Vec<&'a str> {
    let mut chunks = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0;
    for &offset in offsets {
        if offset > start && offset < payload.len() && payload.is_char_boundary(offset) {
            chunks.push(&payload[start..offset]);
            start = offset;
        }
    }
    chunks.push(&payload[start..]);
    chunks
}
