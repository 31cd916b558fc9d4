use alloc::{string::String, vec::Vec};

use super::{
    block::{BlockKind, BlockState},
    chunker::flush_block,
    detect::{BlockMatch, BlockStart, TableMatch},
    event_queue::EventQueue,
    state::{FenceMode, ParserState},
};
use crate::{Alignment, ElementId, ElementType, Metadata, TableOutputMode};

impl ParserState {
    /// Begins the element for a block confirmed at a line start.
    ///
    /// Any open paragraph-like blocks end first. Single-line constructs are
    /// emitted completely; the rest become the innermost open block.
    pub(crate) fn open_detected(&mut self, found: BlockMatch, out: &mut EventQueue) {
        self.close_paragraph_blocks(out);
        self.advance(found.consumed);

        let id = self.ids.next_id();
        let element_type = found.element_type();
        let metadata = found.metadata();
        tracing::debug!(%id, %element_type, marker = %found.marker, "block detected");

        match found.start {
            BlockStart::Header { text, .. }
            | BlockStart::HorizontalRule { text }
            | BlockStart::MathLine { text } => {
                out.begin(element_type, id, metadata);
                out.delta(id, text.as_str());
                out.end(id, text);
            }
            BlockStart::Table(table)
                if self.options.table_output == TableOutputMode::Structured =>
            {
                out.begin(element_type, id, metadata);
                self.emit_structured_table(id, table, out);
            }
            BlockStart::Table(table) => {
                out.begin(element_type, id, metadata);
                let mut block = BlockState::new(id, BlockKind::Table, found.marker, None);
                block.content.push_str(&table.header_line);
                block.content.push('\n');
                flush_block(&mut block, false, &self.options, &mut self.ids, out);
                self.blocks.push(block);
            }
            BlockStart::CodeFence(fence) => {
                out.begin(element_type, id, metadata);
                self.blocks.push(BlockState::new(
                    id,
                    BlockKind::Code,
                    found.marker.clone(),
                    found.end_marker,
                ));
                self.push_fence_mode(FenceMode {
                    fence_char: fence.fence_char,
                    fence_length: fence.fence_length,
                    info: fence.info,
                    marker: found.marker,
                    owner: id,
                });
            }
            BlockStart::Math => {
                out.begin(element_type, id, metadata);
                self.blocks.push(BlockState::new(
                    id,
                    BlockKind::Math,
                    found.marker,
                    found.end_marker,
                ));
            }
            BlockStart::List(item) => {
                out.begin(element_type, id, metadata);
                self.blocks.push(BlockState::new(
                    id,
                    BlockKind::List {
                        ordered: item.ordered,
                    },
                    found.marker,
                    None,
                ));
            }
            BlockStart::Quote => {
                out.begin(element_type, id, metadata);
                self.blocks
                    .push(BlockState::new(id, BlockKind::Quote, found.marker, None));
                self.skipping_whitespace = true;
            }
        }
    }

    /// Emits a complete table as `thead`/`tbody`/`row`/`col` elements.
    ///
    /// Container elements end with the text rendering of the rows they hold,
    /// the same text a text-mode table would report.
    fn emit_structured_table(&mut self, id: ElementId, table: TableMatch, out: &mut EventQueue) {
        let TableMatch {
            alignments,
            header,
            rows,
            ..
        } = table;

        let thead = self.ids.next_id();
        out.begin(ElementType::Thead, thead, None);
        let head_text = self.emit_row(&header, &alignments, true, out);
        out.end(thead, head_text.as_str());

        let tbody = self.ids.next_id();
        out.begin(ElementType::Tbody, tbody, None);
        let mut body_text = String::new();
        for row in &rows {
            body_text.push_str(&self.emit_row(row, &alignments, false, out));
        }
        out.end(tbody, body_text.as_str());

        out.end(id, head_text + &body_text);
    }

    fn emit_row(
        &mut self,
        cells: &[String],
        alignments: &[Alignment],
        header: bool,
        out: &mut EventQueue,
    ) -> String {
        let row = self.ids.next_id();
        out.begin(ElementType::Row, row, None);

        let mut texts = Vec::with_capacity(alignments.len());
        for (index, alignment) in alignments.iter().enumerate() {
            let cell = cells.get(index).map_or("", String::as_str);
            let col = self.ids.next_id();
            out.begin(
                ElementType::Col,
                col,
                Some(Metadata::Col {
                    alignment: *alignment,
                    header,
                }),
            );
            out.delta(col, cell);
            out.end(col, cell);
            texts.push(cell);
        }

        let mut text = texts.join(" | ");
        text.push('\n');
        out.end(row, text.clone());
        text
    }
}
