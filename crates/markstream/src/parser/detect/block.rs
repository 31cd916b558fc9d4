use alloc::string::ToString;

use super::{BlockMatch, BlockStart, FenceInfo, ListMarker, complete_line};

const MAX_HEADER_LEVEL: usize = 6;
const MAX_ORDERED_DIGITS: usize = 9;

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn run_length(window: &str, marker: char) -> usize {
    window.chars().take_while(|c| *c == marker).count()
}

pub(crate) fn detect_code_fence(window: &str, eof: bool) -> Option<BlockMatch> {
    let fence_char = window.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let (line, consumed) = complete_line(window, eof)?;
    let fence_length = run_length(line, fence_char);
    if fence_length < 3 {
        return None;
    }
    let info = line[fence_length..].trim();
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    let language = info
        .split_whitespace()
        .next()
        .map(ToString::to_string);
    let marker = line[..fence_length].to_string();

    Some(BlockMatch {
        end_marker: Some(marker.clone()),
        marker,
        consumed,
        start: BlockStart::CodeFence(FenceInfo {
            fence_char,
            fence_length,
            info: info.to_string(),
            language,
        }),
    })
}

pub(crate) fn might_be_code_fence(window: &str) -> bool {
    if window.contains('\n') {
        return false;
    }
    let Some(fence_char) = window.chars().next().filter(|c| matches!(c, '`' | '~')) else {
        return false;
    };
    let run = run_length(window, fence_char);
    run == window.len() || (run >= 3 && !(fence_char == '`' && window[run..].contains('`')))
}

pub(crate) fn detect_math(window: &str, eof: bool) -> Option<BlockMatch> {
    if !window.starts_with("$$") {
        return None;
    }
    let (line, consumed) = complete_line(window, eof)?;
    let rest = line[2..].trim();
    if rest.is_empty() {
        return Some(BlockMatch {
            marker: "$$".into(),
            consumed,
            end_marker: Some("$$".into()),
            start: BlockStart::Math,
        });
    }
    let text = rest.strip_suffix("$$")?.trim();
    Some(BlockMatch {
        marker: "$$".into(),
        consumed,
        end_marker: None,
        start: BlockStart::MathLine { text: text.into() },
    })
}

pub(crate) fn might_be_math(window: &str) -> bool {
    !window.contains('\n') && (window == "$" || window.starts_with("$$"))
}

pub(crate) fn detect_header(window: &str, eof: bool) -> Option<BlockMatch> {
    let level = run_length(window, '#');
    if level == 0 || level > MAX_HEADER_LEVEL {
        return None;
    }
    let (line, consumed) = complete_line(window, eof)?;
    let after = &line[level..];
    if !after.is_empty() && !after.starts_with(is_blank) {
        return None;
    }

    Some(BlockMatch {
        marker: line[..level].into(),
        consumed,
        end_marker: None,
        start: BlockStart::Header {
            level: u8::try_from(level).unwrap_or(u8::MAX),
            text: strip_closing_hashes(after.trim()).into(),
        },
    })
}

/// Removes an optional closing sequence of `#`s, which only counts when it
/// is the whole text or separated from the text by whitespace.
fn strip_closing_hashes(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        text
    } else if without.is_empty() {
        without
    } else if without.ends_with(is_blank) {
        without.trim_end()
    } else {
        text
    }
}

pub(crate) fn might_be_header(window: &str) -> bool {
    if window.contains('\n') {
        return false;
    }
    let level = run_length(window, '#');
    (1..=MAX_HEADER_LEVEL).contains(&level)
        && (level == window.len() || window[level..].starts_with(is_blank))
}

pub(crate) fn detect_horizontal_rule(window: &str, eof: bool) -> Option<BlockMatch> {
    let marker = window.chars().next().filter(|c| matches!(c, '-' | '*' | '_'))?;
    let (line, consumed) = complete_line(window, eof)?;
    if !line.chars().all(|c| c == marker || is_blank(c)) {
        return None;
    }
    if line.chars().filter(|c| *c == marker).count() < 3 {
        return None;
    }
    let text = line.trim_end();

    Some(BlockMatch {
        marker: text.into(),
        consumed,
        end_marker: None,
        start: BlockStart::HorizontalRule { text: text.into() },
    })
}

pub(crate) fn might_be_horizontal_rule(window: &str) -> bool {
    let Some(marker) = window.chars().next().filter(|c| matches!(c, '-' | '*' | '_')) else {
        return false;
    };
    window.chars().all(|c| c == marker || is_blank(c))
}

/// Bullet or ordinal of a list item, and where the item text starts.
struct ItemMarker<'a> {
    marker: &'a str,
    ordered: bool,
    start: Option<u64>,
    /// Bytes from the window start to the end of the marker itself.
    end: usize,
}

fn item_marker(window: &str, indent: usize) -> Option<ItemMarker<'_>> {
    let rest = &window[indent..];
    let first = rest.chars().next()?;
    if matches!(first, '-' | '*' | '+') {
        return Some(ItemMarker {
            marker: &rest[..1],
            ordered: false,
            start: None,
            end: indent + 1,
        });
    }
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > MAX_ORDERED_DIGITS {
        return None;
    }
    if !matches!(rest[digits..].chars().next(), Some('.' | ')')) {
        return None;
    }
    Some(ItemMarker {
        marker: &rest[..=digits],
        ordered: true,
        start: rest[..digits].parse().ok(),
        end: indent + digits + 1,
    })
}

pub(crate) fn detect_list(window: &str, _eof: bool) -> Option<BlockMatch> {
    let indent = window.chars().take_while(|c| *c == ' ').count();
    let item = item_marker(window, indent)?;
    let spacing = window[item.end..].chars().take_while(|c| is_blank(*c)).count();
    if spacing == 0 {
        return None;
    }
    let consumed = item.end + spacing;
    match window[consumed..].chars().next() {
        None | Some('\n' | '\r') => return None,
        Some(_) => {}
    }

    Some(BlockMatch {
        marker: item.marker.into(),
        consumed,
        end_marker: None,
        start: BlockStart::List(ListMarker {
            ordered: item.ordered,
            level: indent / 2,
            start: item.start,
        }),
    })
}

pub(crate) fn might_be_list(window: &str) -> bool {
    if window.contains('\n') {
        return false;
    }
    let indent = window.chars().take_while(|c| *c == ' ').count();
    let rest = &window[indent..];
    if rest.is_empty() {
        return true;
    }
    if rest.starts_with(['-', '*', '+']) {
        return rest[1..].chars().all(is_blank);
    }
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > MAX_ORDERED_DIGITS {
        return false;
    }
    let after = &rest[digits..];
    after.is_empty() || (after.starts_with(['.', ')']) && after[1..].chars().all(is_blank))
}

pub(crate) fn detect_quote(window: &str) -> Option<BlockMatch> {
    window.starts_with('>').then(|| BlockMatch {
        marker: ">".into(),
        consumed: 1,
        end_marker: None,
        start: BlockStart::Quote,
    })
}

/// Length of a blank line at the start of `window`, including its newline.
///
/// A whitespace-only tail only counts once the stream is closed, since more
/// text may still arrive on the same line.
pub(crate) fn blank_line(window: &str, eof: bool) -> Option<usize> {
    let spaces = window.chars().take_while(|c| is_blank(*c)).count();
    match window[spaces..].chars().next() {
        Some('\n') => Some(spaces + 1),
        None if eof => Some(spaces),
        _ => None,
    }
}

/// True when `window` holds only blanks, so it may still turn into a blank
/// line once its newline arrives.
pub(crate) fn might_be_blank_line(window: &str) -> bool {
    window.chars().all(is_blank)
}

/// Outcome of looking for a closing marker line such as `` ``` `` or `$$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineClose {
    /// The line closes the block; the count includes the trailing newline.
    Close(usize),
    /// The line is still a prefix of a closing line.
    Wait,
    /// The line is block content.
    Content,
}

/// Checks whether the line at the start of `window` is exactly `marker`,
/// optionally followed by whitespace.
///
/// A longer run of the marker's character is content, so a four-backtick
/// line never closes a three-backtick fence.
pub(crate) fn match_closing_line(window: &str, marker: &str, eof: bool) -> LineClose {
    if window.len() < marker.len() {
        return if !eof && marker.starts_with(window) {
            LineClose::Wait
        } else {
            LineClose::Content
        };
    }
    let Some(rest) = window.strip_prefix(marker) else {
        return LineClose::Content;
    };
    let spaces = rest.chars().take_while(|c| is_blank(*c)).count();
    match rest[spaces..].chars().next() {
        Some('\n') => LineClose::Close(marker.len() + spaces + 1),
        Some(_) => LineClose::Content,
        None if eof => LineClose::Close(window.len()),
        None => LineClose::Wait,
    }
}
