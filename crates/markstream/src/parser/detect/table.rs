use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use super::{BlockMatch, BlockStart, complete_line};
use crate::Alignment;

/// A pipe table whose header and separator rows have been confirmed.
///
/// `rows` is only populated when the whole table was requested up front, as
/// for structured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableMatch {
    pub alignments: Vec<Alignment>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// The raw header line, without its newline.
    pub header_line: String,
}

/// Splits a table row into trimmed cells, honouring `\|` escapes.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(core::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    cells.push(cell);
    cells.iter().map(|cell| cell.trim().to_string()).collect()
}

/// Renders a row the way text-mode tables report it: trimmed cells joined by
/// `" | "`.
pub(crate) fn render_row(line: &str) -> String {
    split_row(line).join(" | ")
}

fn parse_separator(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('-') {
        return None;
    }
    split_row(line)
        .iter()
        .map(|cell| {
            let left = cell.starts_with(':');
            let right = cell.len() > 1 && cell.ends_with(':');
            let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];
            if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect()
}

pub(crate) fn detect_table(window: &str, eof: bool, structured: bool) -> Option<BlockMatch> {
    if !window.starts_with('|') {
        return None;
    }
    let (header_line, header_len) = complete_line(window, eof)?;
    let (separator, separator_len) = complete_line(&window[header_len..], eof)?;
    let alignments = parse_separator(separator)?;
    let header = split_row(header_line);
    if header.len() != alignments.len() {
        return None;
    }

    let mut consumed = header_len + separator_len;
    let mut rows = Vec::new();
    if structured {
        loop {
            let rest = &window[consumed..];
            if rest.is_empty() && !eof {
                return None;
            }
            if !rest.starts_with('|') {
                break;
            }
            let (line, len) = complete_line(rest, eof)?;
            rows.push(split_row(line));
            consumed += len;
        }
    }

    Some(BlockMatch {
        marker: "|".into(),
        consumed,
        end_marker: None,
        start: BlockStart::Table(TableMatch {
            alignments,
            header,
            rows,
            header_line: header_line.into(),
        }),
    })
}

pub(crate) fn might_be_table(window: &str, structured: bool) -> bool {
    if !window.starts_with('|') {
        return false;
    }
    let Some(header_end) = window.find('\n') else {
        return true;
    };
    let rest = &window[header_end + 1..];
    let Some(separator_end) = rest.find('\n') else {
        return rest.chars().all(|c| matches!(c, '|' | ':' | '-' | ' ' | '\t'));
    };
    structured
        && parse_separator(&rest[..separator_end]).is_some_and(|alignments| {
            alignments.len() == split_row(&window[..header_end]).len()
        })
}
