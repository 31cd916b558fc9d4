use alloc::{boxed::Box, string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen, QuickCheck};

use super::{parse_chunks, received_text};
use crate::{
    ElementType, InlineEmphasisMode, ParseEvent, ParserOptions, TableOutputMode,
    chunk_utils::{produce_fixed_chunks, split_at_offsets},
    check_well_formed, summarize,
};

/// Markdown-ish text assembled from fragments that exercise every detector,
/// including ones that straddle construct boundaries.
#[derive(Debug, Clone)]
struct Markdown(String);

const PIECES: &[&str] = &[
    "# ", "## ", "####### ", "#", "\n", "\n\n", "  ", "\t", "- ", "* ", "1. ", "12) ", "> ", "|",
    " | ", "|---|", "|:-:|", "\\|", "```", "```rust", "~~~", "$$", "$", "**", "*", "~~", "~",
    "`", "[", "]", "(", ")", "[link](https://e.x)", "---", "***", "word", "other",
    "supercalifragilisticexpialidocious", "é", "🚀", "x",
];

impl Arbitrary for Markdown {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 24;
        let mut text = String::new();
        for _ in 0..len {
            if let Some(piece) = g.choose(PIECES) {
                text.push_str(piece);
            }
        }
        Self(text)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let chars: Vec<char> = self.0.chars().collect();
        Box::new(
            (0..chars.len())
                .map(move |skip| {
                    chars
                        .iter()
                        .enumerate()
                        .filter(|(at, _)| *at != skip)
                        .map(|(_, c)| *c)
                        .collect()
                })
                .map(Markdown),
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Modes(ParserOptions);

impl Arbitrary for Modes {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(ParserOptions {
            table_output: if bool::arbitrary(g) {
                TableOutputMode::Structured
            } else {
                TableOutputMode::Text
            },
            inline_emphasis: if bool::arbitrary(g) {
                InlineEmphasisMode::Preserve
            } else {
                InlineEmphasisMode::Strip
            },
            max_delta_chunk_size: 1 + usize::arbitrary(g) % 24,
        })
    }
}

/// Deltas received by an element, nested ones included, add up to its final
/// content. Code is reported trimmed, and structured table containers join
/// their cells with separators that are not deltas.
fn round_trips(events: &[ParseEvent]) -> bool {
    let received = received_text(events);
    summarize(events).into_iter().all(|(id, summary)| {
        let Some(final_content) = summary.final_content else {
            return false;
        };
        let text = received.get(&id).map_or("", String::as_str);
        match summary.element_type {
            ElementType::Code => text.trim() == final_content,
            // Structured containers carry no deltas of their own.
            ElementType::Table | ElementType::Thead | ElementType::Tbody | ElementType::Row
                if summary.deltas.is_empty() =>
            {
                true
            }
            _ => text == final_content,
        }
    })
}

/// Property: the events for a document do not depend on how it is split into
/// fragments, and they always form a well-formed stream.
#[test]
fn partition_invariance_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Markdown, offsets: Vec<usize>, modes: Modes) -> bool {
        let text = doc.0.as_str();
        let whole = parse_chunks([text], modes.0);

        let mut sorted = offsets;
        sorted.iter_mut().for_each(|offset| *offset %= text.len() + 1);
        sorted.sort_unstable();
        let split = parse_chunks(split_at_offsets(text, &sorted), modes.0);
        let by_char = parse_chunks(produce_fixed_chunks(text, 1), modes.0);

        whole == split && whole == by_char && check_well_formed(&whole).is_ok() && round_trips(&whole)
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Markdown, Vec<usize>, Modes) -> bool);
}

#[test]
fn partition_invariance_regressions() {
    let documents = [
        "**a *b* c**",
        "| a |\n|---|\n| 1 |\n\ntext",
        "1. one\n2. two\n- three\n",
        "> [x](y) *z*\n\n```\n**not**\n```",
        "#\n##\n$$ x $$\n$$\ny\n$",
        "supercalifragilisticexpialidocious🚀 é",
    ];
    for document in documents {
        for options in [
            ParserOptions::default(),
            ParserOptions {
                table_output: TableOutputMode::Structured,
                inline_emphasis: InlineEmphasisMode::Preserve,
                max_delta_chunk_size: 3,
            },
        ] {
            let whole = parse_chunks([document], options);
            for size in 1..=5 {
                let split = parse_chunks(produce_fixed_chunks(document, size), options);
                assert_eq!(whole, split, "{document:?} in {size}-char fragments");
            }
            check_well_formed(&whole).unwrap();
            assert!(round_trips(&whole), "{document:?}");
        }
    }
}
