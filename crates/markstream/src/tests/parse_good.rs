use alloc::{string::String, vec, vec::Vec};

use super::{parse, parse_chunks, received_text};
use crate::{
    Alignment, Annotation, ElementId, ElementType, InlineEmphasisMode, Metadata, ParseEvent,
    ParserOptions, TableOutputMode, chunk_utils::produce_fixed_chunks, check_well_formed,
    summarize,
};

/// `(type, final_content)` of every element, in opening order.
fn elements(events: &[ParseEvent]) -> Vec<(ElementType, String)> {
    summarize(events)
        .into_iter()
        .map(|(_, summary)| (summary.element_type, summary.final_content.unwrap_or_default()))
        .collect()
}

fn begin_metadata(events: &[ParseEvent], id: u64) -> Option<Metadata> {
    events.iter().find_map(|event| match event {
        ParseEvent::Begin {
            element_id,
            metadata,
            ..
        } if *element_id == ElementId::new(id) => metadata.clone(),
        _ => None,
    })
}

#[test]
fn code_is_streamed_one_character_at_a_time() {
    let events = parse("```python\n# Large\ncode line 2\n```");
    let deltas: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            ParseEvent::Delta { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(deltas.len(), 20);
    assert!(deltas.iter().all(|delta| delta.chars().count() == 1));
    assert_eq!(deltas.concat(), "# Large\ncode line 2\n");
    assert_eq!(
        elements(&events),
        vec![(ElementType::Code, "# Large\ncode line 2".into())]
    );
    assert_eq!(
        begin_metadata(&events, 1),
        Some(Metadata::Code {
            language: Some("python".into()),
            info: "python".into(),
            fence_char: '`',
            fence_length: 3,
        })
    );
}

#[test]
fn header_then_paragraph() {
    let events = parse("# Title\n\nBody text\n\n");
    assert_eq!(
        elements(&events),
        vec![
            (ElementType::Header, "Title".into()),
            (ElementType::Text, "Body text".into()),
        ]
    );
}

#[test]
fn math_block() {
    let events = parse("$$\nE = mc^2\n$$\n");
    let found = elements(&events);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, ElementType::Math);
    assert!(found[0].1.contains("E = mc^2"));
    assert_eq!(begin_metadata(&events, 1), Some(Metadata::Math { inline: false }));
}

#[test]
fn single_line_math() {
    assert_eq!(
        elements(&parse("$$ a^2 + b^2 $$\nafter")),
        vec![
            (ElementType::Math, "a^2 + b^2".into()),
            (ElementType::Text, "after".into()),
        ]
    );
}

#[test]
fn ordered_list_metadata() {
    let events = parse("1. first\n2. second\n3. third\n\n");
    assert_eq!(
        elements(&events),
        vec![(ElementType::List, "first\nsecond\nthird\n".into())]
    );
    assert_eq!(
        begin_metadata(&events, 1),
        Some(Metadata::List {
            ordered: true,
            level: 0,
            start: Some(1),
        })
    );
}

#[test]
fn list_kind_change_starts_a_new_list() {
    let events = parse("- a\n- b\n1. c\n");
    assert_eq!(
        elements(&events),
        vec![
            (ElementType::List, "a\nb\n".into()),
            (ElementType::List, "c\n".into()),
        ]
    );
    assert_eq!(
        begin_metadata(&events, 1),
        Some(Metadata::List {
            ordered: false,
            level: 0,
            start: None,
        })
    );
}

const MIXED: &str = "# Heading\n\
\n\
Some *intro* text.\n\
\n\
```rust\n\
fn main() {}\n\
```\n\
\n\
| a | b |\n\
|---|---|\n\
| 1 | 2 |\n\
\n\
> quoted line\n\
\n\
---\n";

#[test]
fn mixed_document_is_complete_whole_and_in_small_fragments() {
    let whole = parse(MIXED);
    let fragmented = parse_chunks(produce_fixed_chunks(MIXED, 3), ParserOptions::default());

    for events in [&whole, &fragmented] {
        check_well_formed(events).unwrap();
        let types: Vec<ElementType> = elements(events).into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            types,
            vec![
                ElementType::Header,
                ElementType::Text,
                ElementType::Code,
                ElementType::Table,
                ElementType::Quote,
                ElementType::HorizontalRule,
            ]
        );
    }
    assert_eq!(whole, fragmented);
    assert_eq!(
        elements(&whole),
        vec![
            (ElementType::Header, "Heading".into()),
            (ElementType::Text, "Some intro text.".into()),
            (ElementType::Code, "fn main() {}".into()),
            (ElementType::Table, "a | b\n1 | 2\n".into()),
            (ElementType::Quote, "quoted line\n".into()),
            (ElementType::HorizontalRule, "---".into()),
        ]
    );
}

#[test]
fn paragraph_lines_are_joined() {
    assert_eq!(
        elements(&parse("one\ntwo\n\nthree")),
        vec![
            (ElementType::Text, "one\ntwo".into()),
            (ElementType::Text, "three".into()),
        ]
    );
}

#[test]
fn a_block_start_ends_the_paragraph() {
    assert_eq!(
        elements(&parse("intro\n## Next\nmore")),
        vec![
            (ElementType::Text, "intro".into()),
            (ElementType::Header, "Next".into()),
            (ElementType::Text, "more".into()),
        ]
    );
}

#[test]
fn quote_lines_are_joined_without_markers() {
    assert_eq!(
        elements(&parse("> first\n>   second\nafter")),
        vec![
            (ElementType::Quote, "first\nsecond\n".into()),
            (ElementType::Text, "after".into()),
        ]
    );
}

#[test]
fn unterminated_constructs_are_closed_at_the_end() {
    assert_eq!(
        elements(&parse("~~~\nlet x = 1;\n")),
        vec![(ElementType::Code, "let x = 1;".into())]
    );
    assert_eq!(
        elements(&parse("$$\nx")),
        vec![(ElementType::Math, "x".into())]
    );
    assert_eq!(
        elements(&parse("see [docs](http")),
        vec![(ElementType::Text, "see [docs](http".into())]
    );
    assert_eq!(elements(&parse("> q")), vec![(ElementType::Quote, "q\n".into())]);
}

#[test]
fn code_fences_only_close_on_the_exact_marker() {
    let events = parse("````md\n```\ninner\n```\n````\nafter\n");
    assert_eq!(
        elements(&events),
        vec![
            (ElementType::Code, "```\ninner\n```".into()),
            (ElementType::Text, "after".into()),
        ]
    );
}

#[test]
fn markdown_inside_code_is_not_interpreted() {
    assert_eq!(
        elements(&parse("```\n# not a header\n- nor a list\n```\n")),
        vec![(ElementType::Code, "# not a header\n- nor a list".into())]
    );
}

#[test]
fn code_final_content_is_trimmed() {
    let events = parse("```\n    indented()\n\tdone();\t\n```\n");
    assert_eq!(
        elements(&events),
        vec![(ElementType::Code, "indented()\n\tdone();".into())]
    );

    // Deltas still carry every character, leading indentation included.
    let streamed: String = events
        .iter()
        .filter_map(|event| match event {
            ParseEvent::Delta { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(streamed, "    indented()\n\tdone();\t\n");
}

#[test]
fn links_annotate_the_enclosing_block() {
    let events = parse("See [docs](https://x.y) now");
    let summary = summarize(&events);
    assert_eq!(summary.len(), 1);
    let (id, text) = &summary[0];
    assert_eq!(*id, ElementId::new(1));
    assert_eq!(text.final_content.as_deref(), Some("See docs now"));
    assert_eq!(
        text.annotations,
        vec![Annotation::UrlCitation {
            title: "docs".into(),
            url: "https://x.y".into(),
            start_index: 4,
            end_index: 23,
        }]
    );
}

#[test]
fn strip_mode_removes_markers() {
    assert_eq!(
        elements(&parse("run `ls -la` or **stop** ~~now~~")),
        vec![(ElementType::Text, "run ls -la or stop now".into())]
    );
}

#[test]
fn preserve_mode_nests_inline_elements() {
    let options = ParserOptions {
        inline_emphasis: InlineEmphasisMode::Preserve,
        ..Default::default()
    };
    let events = parse_chunks(["a **b** *c* `d`"], options);
    check_well_formed(&events).unwrap();

    let summary = summarize(&events);
    let nested: Vec<(ElementType, Option<ElementId>, &str)> = summary
        .iter()
        .map(|(_, s)| (s.element_type, s.parent, s.deltas.as_str()))
        .collect();
    assert_eq!(
        nested,
        vec![
            (ElementType::Text, None, "a   "),
            (ElementType::Strong, Some(ElementId::new(1)), "b"),
            (ElementType::Emphasis, Some(ElementId::new(1)), "c"),
            (ElementType::InlineCode, Some(ElementId::new(1)), "d"),
        ]
    );
    assert_eq!(summary[0].1.final_content.as_deref(), Some("a b c d"));
}

#[test]
fn inner_emphasis_wins_over_an_unfinished_outer_strong() {
    assert_eq!(
        elements(&parse("**bold *inner* text**")),
        vec![(ElementType::Text, "**bold inner text**".into())]
    );
}

#[test]
fn long_words_are_split_at_the_chunk_size() {
    let options = ParserOptions {
        max_delta_chunk_size: 4,
        ..Default::default()
    };
    let events = parse_chunks(["abcdefghij xy"], options);
    let deltas: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            ParseEvent::Delta { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(deltas, vec!["abcd", "efgh", "ij", " ", "xy"]);
}

#[test]
fn text_tables_stream_rows() {
    let events = parse("| a | b \\| c |\n|:-|-:|\n| 1 | 2 |\n\nafter");
    assert_eq!(
        elements(&events),
        vec![
            (ElementType::Table, "a | b | c\n1 | 2\n".into()),
            (ElementType::Text, "after".into()),
        ]
    );
    assert_eq!(
        begin_metadata(&events, 1),
        Some(Metadata::Table {
            alignments: vec![Alignment::Left, Alignment::Right],
        })
    );
}

#[test]
fn structured_tables_nest_cells() {
    let options = ParserOptions {
        table_output: TableOutputMode::Structured,
        ..Default::default()
    };
    let events = parse_chunks(["| h1 | h2 |\n|:--|--:|\n| a |\n"], options);
    check_well_formed(&events).unwrap();

    let types: Vec<(ElementType, String)> = elements(&events);
    assert_eq!(
        types,
        vec![
            (ElementType::Table, "h1 | h2\na | \n".into()),
            (ElementType::Thead, "h1 | h2\n".into()),
            (ElementType::Row, "h1 | h2\n".into()),
            (ElementType::Col, "h1".into()),
            (ElementType::Col, "h2".into()),
            (ElementType::Tbody, "a | \n".into()),
            (ElementType::Row, "a | \n".into()),
            (ElementType::Col, "a".into()),
            (ElementType::Col, String::new()),
        ]
    );
    assert_eq!(
        begin_metadata(&events, 5),
        Some(Metadata::Col {
            alignment: Alignment::Right,
            header: true,
        })
    );
}

#[test]
fn round_trip_of_deltas_and_final_content() {
    let events = parse(MIXED);
    let received = received_text(&events);
    for (id, summary) in summarize(&events) {
        let final_content = summary.final_content.unwrap();
        let text = &received[&id];
        match summary.element_type {
            ElementType::Code => assert_eq!(text.trim(), final_content),
            _ => assert_eq!(*text, final_content),
        }
    }
}

#[test]
fn zero_chunk_size_is_treated_as_one() {
    let options = ParserOptions {
        max_delta_chunk_size: 0,
        ..Default::default()
    };
    let events = parse_chunks(["abc"], options);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, ParseEvent::Delta { .. }))
            .count(),
        3
    );
}
