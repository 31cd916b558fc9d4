use core::{fmt, str::FromStr};

use super::error::ParseOptionError;

/// Default upper bound on the number of characters in one text delta.
pub const DEFAULT_MAX_DELTA_CHUNK_SIZE: usize = 20;

/// Configuration options for the streaming markdown parser.
///
/// Options are fixed when the parser is constructed and stay the same for the
/// whole session.
///
/// # Examples
///
/// ```rust
/// use markstream::{InlineEmphasisMode, ParserOptions, StreamingParser};
///
/// let options = ParserOptions {
///     inline_emphasis: InlineEmphasisMode::Preserve,
///     ..Default::default()
/// };
/// let parser = StreamingParser::new(options);
/// ```
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Upper bound, in characters, for a single word-sized text delta.
    ///
    /// Words shorter than this are flushed whole once their end is known;
    /// longer words are split into pieces of exactly this many characters.
    /// A value of `0` is treated as `1`.
    ///
    /// # Default
    ///
    /// `20`
    pub max_delta_chunk_size: usize,

    /// How `**strong**`, `*emphasis*`, `~~strike~~` and `` `code` `` spans
    /// are reported.
    ///
    /// # Default
    ///
    /// [`InlineEmphasisMode::Strip`]
    pub inline_emphasis: InlineEmphasisMode,

    /// How pipe tables are reported.
    ///
    /// # Default
    ///
    /// [`TableOutputMode::Text`]
    pub table_output: TableOutputMode,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_delta_chunk_size: DEFAULT_MAX_DELTA_CHUNK_SIZE,
            inline_emphasis: InlineEmphasisMode::default(),
            table_output: TableOutputMode::default(),
        }
    }
}

impl ParserOptions {
    /// Returns a copy with out-of-range values clamped into range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.max_delta_chunk_size = self.max_delta_chunk_size.max(1);
        self
    }
}

/// Reporting policy for inline emphasis, strikethrough and code spans.
///
/// - `Strip`: the markers are removed and the inner text joins the
///   surrounding text deltas.
/// - `Preserve`: each span becomes a nested element with its own
///   `begin`/`delta`/`end` events.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineEmphasisMode {
    #[default]
    /// Remove markers and merge the span into the surrounding text.
    Strip,
    /// Emit each span as a nested element.
    Preserve,
}

/// Reporting policy for pipe tables.
///
/// - `Text`: the table streams row by row as plain text deltas.
/// - `Structured`: the complete table is emitted at once as nested
///   `thead`/`tbody`/`row`/`col` elements.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableOutputMode {
    #[default]
    /// Stream rows as text.
    Text,
    /// Emit nested structural elements once the table is complete.
    Structured,
}

impl InlineEmphasisMode {
    /// The configuration name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strip => "strip",
            Self::Preserve => "preserve",
        }
    }
}

impl TableOutputMode {
    /// The configuration name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for InlineEmphasisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TableOutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InlineEmphasisMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strip" => Ok(Self::Strip),
            "preserve" => Ok(Self::Preserve),
            other => Err(ParseOptionError::UnknownEmphasisMode(other.into())),
        }
    }
}

impl FromStr for TableOutputMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "structured" => Ok(Self::Structured),
            other => Err(ParseOptionError::UnknownTableMode(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn zero_chunk_size_is_clamped() {
        let options = ParserOptions {
            max_delta_chunk_size: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(options.max_delta_chunk_size, 1);
    }

    #[test]
    fn modes_parse_from_config_names() {
        assert_eq!("preserve".parse::<InlineEmphasisMode>(), Ok(InlineEmphasisMode::Preserve));
        assert_eq!("structured".parse::<TableOutputMode>(), Ok(TableOutputMode::Structured));
        assert_eq!(
            "bold".parse::<InlineEmphasisMode>(),
            Err(ParseOptionError::UnknownEmphasisMode("bold".into()))
        );
        assert_eq!(InlineEmphasisMode::Strip.to_string(), "strip");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParserOptions =
            serde_json::from_str(r#"{"table_output":"structured"}"#).unwrap();
        assert_eq!(options.table_output, TableOutputMode::Structured);
        assert_eq!(options.max_delta_chunk_size, DEFAULT_MAX_DELTA_CHUNK_SIZE);
        assert_eq!(options.inline_emphasis, InlineEmphasisMode::Strip);
    }
}
