#![expect(missing_docs)]

use insta::assert_snapshot;
use markstream::{InlineEmphasisMode, ParserOptions, chunk_utils::produce_fixed_chunks};

mod common;

use common::{collect, render};

#[test]
fn snapshot_preserved_inline_spans() {
    let document = "## Setup\n\nRun `make` *now*.\n\n- one\n- two\n";
    let options = ParserOptions {
        inline_emphasis: InlineEmphasisMode::Preserve,
        ..Default::default()
    };
    let events = collect(produce_fixed_chunks(document, 2), options);

    assert_snapshot!(render(&events), @r#"
    begin #1 header Header { level: 2 }
    delta #1 "Setup"
    end #1 "Setup"
    begin #2 text
    delta #2 "Run"
    delta #2 " "
    begin #3 inline_code
    delta #3 "make"
    end #3 "make"
    delta #2 " "
    begin #4 emphasis
    delta #4 "now"
    end #4 "now"
    delta #2 "."
    end #2 "Run make now."
    begin #5 list List { ordered: false, level: 0, start: None }
    delta #5 "one"
    delta #5 "\n"
    delta #5 "two"
    delta #5 "\n"
    end #5 "one\ntwo\n"
    "#);
}

#[test]
fn snapshot_fences_and_rules() {
    let events = collect(
        ["### Notes ###\n~~~js\nx\n~~~\n___\n"],
        ParserOptions::default(),
    );

    assert_snapshot!(render(&events), @r#"
    begin #1 header Header { level: 3 }
    delta #1 "Notes"
    end #1 "Notes"
    begin #2 code Code { language: Some("js"), info: "js", fence_char: '~', fence_length: 3 }
    delta #2 "x"
    delta #2 "\n"
    end #2 "x"
    begin #3 horizontal_rule
    delta #3 "___"
    end #3 "___"
    "#);
}

#[test]
fn snapshot_text_table_rows() {
    let events = collect(
        produce_fixed_chunks("| k | v |\n|---|---|\n| a | 1 |\n", 5),
        ParserOptions::default(),
    );

    assert_snapshot!(render(&events), @r#"
    begin #1 table Table { alignments: [None, None] }
    delta #1 "k"
    delta #1 " "
    delta #1 "|"
    delta #1 " "
    delta #1 "v"
    delta #1 "\n"
    delta #1 "a"
    delta #1 " "
    delta #1 "|"
    delta #1 " "
    delta #1 "1"
    delta #1 "\n"
    end #1 "k | v\na | 1\n"
    "#);
}
