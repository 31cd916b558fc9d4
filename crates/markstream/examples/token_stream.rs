//! Renders an assistant answer while it is still being generated.
//!
//! The answer arrives as a handful of irregular tokens, the way chat
//! completion APIs deliver them. Every event is handled as soon as the parser
//! reports it: headers and paragraphs are printed word by word, the code
//! block character by character, and link targets are collected as numbered
//! citations shown after the answer.
//!
//! Run with
//!
//! ```bash
//! cargo run -p markstream --example token_stream
//! ```

use std::{
    collections::HashMap,
    io::{self, Write},
};

use markstream::{Annotation, ElementType, Metadata, ParseEvent, ParserOptions, StreamingParser};

fn main() -> io::Result<()> {
    // In real life this would come from the network.
    let simulated_stream: [&str; 8] = [
        "# Deploy",
        "ing\n\nUse ",
        "**care**",
        " when run",
        "ning:\n\n```sh\n",
        "make de",
        "ploy\n```\n\nSee [ops",
        "](https://ops.example.com) docs.",
    ];

    let mut parser = StreamingParser::new(ParserOptions::default());
    let mut screen = Screen::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for token in simulated_stream {
        for event in parser.feed(token) {
            screen.apply(&event, &mut out)?;
        }
    }
    for event in parser.finish() {
        screen.apply(&event, &mut out)?;
    }
    screen.print_citations(&mut out)?;

    assert_eq!(
        screen.rendered,
        "# Deploying\n\nUse care when running:\n\n```sh\nmake deploy\n```\n\nSee ops docs.\n\n\
         [1] ops <https://ops.example.com>\n"
    );
    Ok(())
}

/// What has been shown so far, plus the citations waiting to be listed.
#[derive(Default)]
struct Screen {
    open: HashMap<markstream::ElementId, ElementType>,
    citations: Vec<(String, String)>,
    rendered: String,
}

impl Screen {
    fn show(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        self.rendered.push_str(text);
        write!(out, "{text}")?;
        out.flush()
    }

    fn apply(&mut self, event: &ParseEvent, out: &mut impl Write) -> io::Result<()> {
        match event {
            ParseEvent::Begin {
                element_type,
                element_id,
                metadata,
            } => {
                self.open.insert(*element_id, *element_type);
                match (element_type, metadata) {
                    (ElementType::Header, Some(Metadata::Header { level })) => {
                        let marker = "#".repeat(usize::from(*level));
                        self.show(&format!("{marker} "), out)?;
                    }
                    (ElementType::Code, Some(Metadata::Code { language, .. })) => {
                        let language = language.as_deref().unwrap_or_default();
                        self.show(&format!("```{language}\n"), out)?;
                    }
                    _ => {}
                }
            }
            ParseEvent::Delta { content, .. } => self.show(content, out)?,
            ParseEvent::End { element_id, .. } => match self.open.remove(element_id) {
                Some(ElementType::Code) => self.show("```\n\n", out)?,
                Some(kind) if kind.is_block() => self.show("\n\n", out)?,
                _ => {}
            },
            ParseEvent::Annotation {
                annotation: Annotation::UrlCitation { title, url, .. },
                ..
            } => self.citations.push((title.clone(), url.clone())),
        }
        Ok(())
    }

    fn print_citations(&mut self, out: &mut impl Write) -> io::Result<()> {
        let lines: Vec<String> = self
            .citations
            .iter()
            .enumerate()
            .map(|(index, (title, url))| format!("[{}] {title} <{url}>\n", index + 1))
            .collect();
        for line in lines {
            self.show(&line, out)?;
        }
        Ok(())
    }
}
