use alloc::{string::String, vec::Vec};

use super::block::{BlockKind, BlockState};
use crate::{ElementId, ParserOptions};

/// Processed input kept before it is dropped from the buffer.
const COMPACT_THRESHOLD: usize = 4096;

/// Hands out element ids for one parser.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub(crate) fn next_id(&mut self) -> ElementId {
        self.last += 1;
        ElementId::new(self.last)
    }
}

/// An open code fence and the block it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenceMode {
    pub fence_char: char,
    pub fence_length: usize,
    pub info: String,
    pub marker: String,
    pub owner: ElementId,
}

/// Everything the parser knows about the stream so far.
#[derive(Debug)]
pub(crate) struct ParserState {
    /// Unconsumed input, preceded by at most a little consumed context.
    pub buffer: String,
    /// Position of the next unconsumed byte in `buffer`.
    pub processed: usize,
    /// Bytes dropped from the front of `buffer` so far.
    pub discarded: usize,
    /// Open blocks, outermost first.
    pub blocks: Vec<BlockState>,
    pub fences: Vec<FenceMode>,
    pub ids: IdGenerator,
    pub options: ParserOptions,
    /// Set after a quote marker; leading blanks of the line are skipped.
    pub skipping_whitespace: bool,
    pub end_of_input: bool,
}

impl ParserState {
    pub(crate) fn new(options: ParserOptions) -> Self {
        Self {
            buffer: String::new(),
            processed: 0,
            discarded: 0,
            blocks: Vec::new(),
            fences: Vec::new(),
            ids: IdGenerator::default(),
            options: options.normalized(),
            skipping_whitespace: false,
            end_of_input: false,
        }
    }

    /// The unconsumed input.
    pub(crate) fn tail(&self) -> &str {
        &self.buffer[self.processed..]
    }

    /// Absolute stream offset of the next unconsumed byte.
    pub(crate) fn position(&self) -> usize {
        self.discarded + self.processed
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.processed += bytes;
    }

    /// True at the very start of the stream or right after a newline.
    pub(crate) fn at_line_start(&self) -> bool {
        self.position() == 0 || self.buffer[..self.processed].ends_with('\n')
    }

    /// Drops consumed input, keeping the last consumed character so that
    /// [`Self::at_line_start`] still works.
    pub(crate) fn compact(&mut self) {
        if self.processed < COMPACT_THRESHOLD {
            return;
        }
        let keep_from = self.buffer[..self.processed]
            .char_indices()
            .next_back()
            .map_or(self.processed, |(at, _)| at);
        self.buffer.drain(..keep_from);
        self.processed -= keep_from;
        self.discarded += keep_from;
    }

    pub(crate) fn push_fence_mode(&mut self, fence: FenceMode) {
        tracing::debug!(
            owner = %fence.owner,
            fence_char = %fence.fence_char,
            fence_length = fence.fence_length,
            info = %fence.info,
            "entering fence mode"
        );
        self.fences.push(fence);
    }

    pub(crate) fn pop_fence_mode(&mut self) -> Option<FenceMode> {
        let fence = self.fences.pop();
        if let Some(fence) = &fence {
            tracing::debug!(owner = %fence.owner, "leaving fence mode");
        }
        fence
    }

    /// The innermost open code block, if input is currently inside a fence.
    pub(crate) fn open_fence(&self) -> Option<&FenceMode> {
        self.fences
            .last()
            .filter(|fence| self.blocks.last().is_some_and(|block| block.id == fence.owner))
    }

    pub(crate) fn innermost(&self) -> Option<&BlockState> {
        self.blocks.last()
    }

    pub(crate) fn innermost_kind(&self) -> Option<&BlockKind> {
        self.blocks.last().map(|block| &block.kind)
    }
}
