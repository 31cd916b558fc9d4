use alloc::string::String;

use super::{
    Step,
    block::{BlockKind, BlockState},
    chunker::flush_block,
    detect::{
        BlockStart, Detection, LineClose, blank_line, detect_link, match_closing_line,
        might_be_blank_line, might_be_link, scan_block,
    },
    event_queue::EventQueue,
    state::ParserState,
};
use crate::{Annotation, ElementType};

impl ParserState {
    /// Advances outside of code blocks: detects new blocks at line starts,
    /// continues or closes open ones and accumulates their text.
    pub(crate) fn process_blocks(&mut self, out: &mut EventQueue) -> Step {
        if self.skipping_whitespace {
            if self.tail().starts_with([' ', '\t']) {
                self.advance(1);
                return Step::Progress;
            }
            self.skipping_whitespace = false;
        }

        if matches!(self.innermost_kind(), Some(BlockKind::Math)) {
            return self.process_math(out);
        }

        if self.at_line_start() {
            if let Some(step) = self.process_line_start(out) {
                return step;
            }
        }

        let Some(block) = self.innermost() else {
            self.open_text_block(out);
            return Step::Progress;
        };
        let is_text = block.kind == BlockKind::Text;
        let has_inline = block.has_inline_content();

        if has_inline && self.tail().starts_with('[') {
            if let Some(step) = self.process_link(out) {
                return step;
            }
        }
        if is_text && self.tail().starts_with('\n') {
            return self.process_paragraph_newline(out);
        }
        self.accumulate(out)
    }

    /// Decides what a new line means for the open block, if anything.
    ///
    /// Returns `None` when the line is ordinary content of the open block.
    fn process_line_start(&mut self, out: &mut EventQueue) -> Option<Step> {
        let eof = self.end_of_input;
        let tables = self.options.table_output;

        match self.innermost_kind().cloned() {
            None => {
                if let Some(len) = blank_line(self.tail(), eof) {
                    self.advance(len);
                    return Some(Step::Progress);
                }
                if !eof && might_be_blank_line(self.tail()) {
                    return Some(Step::NeedInput);
                }
                match scan_block(self.tail(), eof, tables) {
                    Detection::Wait => Some(Step::NeedInput),
                    Detection::Match(found) => {
                        self.open_detected(found, out);
                        Some(Step::Progress)
                    }
                    Detection::NoMatch => {
                        self.open_text_block(out);
                        Some(Step::Progress)
                    }
                }
            }
            Some(BlockKind::Quote) => {
                if self.tail().starts_with('>') {
                    self.advance(1);
                    self.skipping_whitespace = true;
                } else {
                    if let Some(len) = blank_line(self.tail(), eof) {
                        self.advance(len);
                    }
                    self.close_paragraph_blocks(out);
                }
                Some(Step::Progress)
            }
            Some(BlockKind::Table) => {
                if self.tail().starts_with('|') {
                    return None;
                }
                if let Some(len) = blank_line(self.tail(), eof) {
                    self.advance(len);
                }
                self.close_paragraph_blocks(out);
                Some(Step::Progress)
            }
            Some(BlockKind::List { ordered }) => {
                if let Some(len) = blank_line(self.tail(), eof) {
                    self.advance(len);
                    self.close_paragraph_blocks(out);
                    return Some(Step::Progress);
                }
                if !eof && might_be_blank_line(self.tail()) {
                    return Some(Step::NeedInput);
                }
                match scan_block(self.tail(), eof, tables) {
                    Detection::Wait => Some(Step::NeedInput),
                    Detection::Match(found) => {
                        match found.start {
                            BlockStart::List(item) if item.ordered == ordered => {
                                self.advance(found.consumed);
                            }
                            _ => self.close_paragraph_blocks(out),
                        }
                        Some(Step::Progress)
                    }
                    Detection::NoMatch => None,
                }
            }
            Some(BlockKind::Text | BlockKind::Math | BlockKind::Code) => None,
        }
    }

    /// Handles a newline inside a paragraph by looking at the next line.
    ///
    /// A blank line or the start of another block ends the paragraph;
    /// otherwise the newline is paragraph content.
    fn process_paragraph_newline(&mut self, out: &mut EventQueue) -> Step {
        let eof = self.end_of_input;
        let after = &self.tail()[1..];

        if after.is_empty() {
            if !eof {
                return Step::NeedInput;
            }
            self.advance(1);
            return Step::Progress;
        }
        if let Some(len) = blank_line(after, eof) {
            self.advance(1 + len);
            self.close_paragraph_blocks(out);
            return Step::Progress;
        }
        if !eof && might_be_blank_line(after) {
            return Step::NeedInput;
        }
        match scan_block(after, eof, self.options.table_output) {
            Detection::Wait => Step::NeedInput,
            Detection::Match(_) => {
                self.advance(1);
                self.close_paragraph_blocks(out);
                Step::Progress
            }
            Detection::NoMatch => self.accumulate(out),
        }
    }

    fn process_math(&mut self, out: &mut EventQueue) -> Step {
        if self.at_line_start() {
            let marker = self
                .innermost()
                .and_then(|block| block.end_marker.clone())
                .unwrap_or_default();
            match match_closing_line(self.tail(), &marker, self.end_of_input) {
                LineClose::Wait => return Step::NeedInput,
                LineClose::Close(consumed) => {
                    self.advance(consumed);
                    self.close_innermost(out);
                    return Step::Progress;
                }
                LineClose::Content => {}
            }
        }
        self.accumulate(out)
    }

    /// Replaces a complete `[title](url)` with its title and annotates the
    /// innermost block. Returns `None` when no link starts here.
    fn process_link(&mut self, out: &mut EventQueue) -> Option<Step> {
        let Some(link) = detect_link(self.tail()) else {
            return (!self.end_of_input && might_be_link(self.tail())).then_some(Step::NeedInput);
        };
        let owner = self.innermost()?.id;
        let start_index = self.position();
        self.advance(link.consumed);
        tracing::trace!(%owner, url = %link.url, "link");

        out.annotate(
            owner,
            Annotation::UrlCitation {
                title: link.title.clone(),
                url: link.url,
                start_index,
                end_index: self.position(),
            },
        );
        for block in &mut self.blocks {
            block.content.push_str(&link.title);
        }
        self.flush_open_blocks(false, out);
        Some(Step::Progress)
    }

    /// Appends the next character to every open block and flushes them.
    fn accumulate(&mut self, out: &mut EventQueue) -> Step {
        let Some(c) = self.tail().chars().next() else {
            return Step::NeedInput;
        };
        self.advance(c.len_utf8());
        for block in &mut self.blocks {
            block.content.push(c);
        }
        self.flush_open_blocks(false, out);
        Step::Progress
    }

    fn flush_open_blocks(&mut self, closing: bool, out: &mut EventQueue) {
        let Self {
            blocks, options, ids, ..
        } = self;
        for block in blocks.iter_mut().rev() {
            flush_block(block, closing, options, ids, out);
        }
    }

    pub(crate) fn open_text_block(&mut self, out: &mut EventQueue) {
        let id = self.ids.next_id();
        out.begin(ElementType::Text, id, None);
        self.blocks
            .push(BlockState::new(id, BlockKind::Text, String::new(), None));
    }

    /// Ends the block at `index`, flushing everything it still holds.
    pub(crate) fn close_block(&mut self, index: usize, out: &mut EventQueue) {
        let mut block = self.blocks.remove(index);
        if block.needs_trailing_newline() {
            block.content.push('\n');
        }
        flush_block(&mut block, true, &self.options, &mut self.ids, out);
        tracing::debug!(
            id = %block.id,
            kind = %block.element_type(),
            marker = %block.start_marker,
            emitted = block.last_emitted_len(),
            "closing block"
        );

        let final_content = if block.kind == BlockKind::Code {
            if self.fences.last().is_some_and(|fence| fence.owner == block.id) {
                self.pop_fence_mode();
            }
            String::from(block.content.trim())
        } else {
            block.emitted
        };
        out.end(block.id, final_content);
    }

    pub(crate) fn close_innermost(&mut self, out: &mut EventQueue) {
        if let Some(index) = self.blocks.len().checked_sub(1) {
            self.close_block(index, out);
        }
    }

    /// Closes every block that ends at a blank line, innermost first.
    pub(crate) fn close_paragraph_blocks(&mut self, out: &mut EventQueue) {
        let mut index = self.blocks.len();
        while index > 0 {
            index -= 1;
            if self.blocks[index].is_paragraph_like() {
                self.close_block(index, out);
            }
        }
    }

    /// Closes everything, innermost first.
    pub(crate) fn close_all(&mut self, out: &mut EventQueue) {
        while !self.blocks.is_empty() {
            self.close_innermost(out);
        }
    }
}
