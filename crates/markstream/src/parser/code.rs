use alloc::string::ToString;

use super::{
    Step,
    detect::{LineClose, match_closing_line},
    event_queue::EventQueue,
    state::ParserState,
};

impl ParserState {
    /// Advances inside a fenced code block.
    ///
    /// Code content is reported one character at a time and never inspected
    /// for markdown. The only thing recognised is a closing fence at a line
    /// start: exactly the opening fence, optionally followed by blanks.
    pub(crate) fn process_code_block(&mut self, out: &mut EventQueue) -> Step {
        let Some(fence) = self.open_fence() else {
            return Step::NeedInput;
        };
        let marker = fence.marker.clone();

        if self.at_line_start() {
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

        let Some(c) = self.tail().chars().next() else {
            return Step::NeedInput;
        };
        self.advance(c.len_utf8());
        if let Some(block) = self.blocks.last_mut() {
            block.content.push(c);
            block.emitted.push(c);
            out.delta(block.id, c.to_string());
        }
        Step::Progress
    }
}
