#![allow(missing_docs, dead_code)]

use core::fmt::Write;

use markstream::{ParseEvent, ParserOptions, StreamingParser};

/// A typical assistant answer touching every block construct.
pub const RESPONSE: &str = "# Installing the CLI

The tool ships as a **single binary**; see [the docs](https://docs.example.com/cli) for details.

```bash
curl -sSf https://example.com/install.sh | sh
tool --version
```

| Platform | Supported |
|:---------|:---------:|
| Linux    | yes       |
| macOS    | yes       |

> Note: older releases used `~/.toolrc` for configuration.

1. Download the archive
2. Unpack it
3. Add it to `PATH`

$$
t = n \\cdot k
$$

---
";

/// Feeds `chunks` in order and returns every event, including the ones
/// produced by `finish`.
pub fn collect<'a>(
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

/// Renders events one per line.
pub fn render(events: &[ParseEvent]) -> String {
    let mut out = String::new();
    for event in events {
        writeln!(out, "{event}").unwrap();
    }
    out
}
