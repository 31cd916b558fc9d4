mod parse_good;
mod property_partition;

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use crate::{ElementId, ParseEvent, ParserOptions, StreamingParser};

/// Feeds `chunks` in order, pulling every event after each one.
pub(crate) fn parse_chunks<'a>(
    chunks: impl IntoIterator<Item = &'a str>,
    options: ParserOptions,
) -> Vec<ParseEvent> {
    let mut parser = StreamingParser::new(options);
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(parser.feed(chunk));
    }
    events.extend(parser.finish());
    events
}

pub(crate) fn parse(text: &str) -> Vec<ParseEvent> {
    parse_chunks([text], ParserOptions::default())
}

/// Concatenation of every delta received while each element was open,
/// including deltas of nested elements.
pub(crate) fn received_text(events: &[ParseEvent]) -> BTreeMap<ElementId, String> {
    let mut open: Vec<ElementId> = Vec::new();
    let mut text: BTreeMap<ElementId, String> = BTreeMap::new();
    for event in events {
        match event {
            ParseEvent::Begin { element_id, .. } => {
                open.push(*element_id);
                text.entry(*element_id).or_default();
            }
            ParseEvent::Delta { content, .. } => {
                for id in &open {
                    text.entry(*id).or_default().push_str(content);
                }
            }
            ParseEvent::End { element_id, .. } => open.retain(|id| id != element_id),
            ParseEvent::Annotation { .. } => {}
        }
    }
    text
}

/// Renders events one per line, for compact snapshots.
pub(crate) fn render(events: &[ParseEvent]) -> String {
    events
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
