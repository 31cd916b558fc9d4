use alloc::string::String;

use thiserror::Error;

/// Error returned when a configuration value cannot be parsed.
///
/// Parsing markdown itself never fails; only textual configuration does.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseOptionError {
    /// The value is not a known [`InlineEmphasisMode`](super::InlineEmphasisMode) name.
    #[error("unknown inline emphasis mode {0:?}, expected \"strip\" or \"preserve\"")]
    UnknownEmphasisMode(String),
    /// The value is not a known [`TableOutputMode`](super::TableOutputMode) name.
    #[error("unknown table output mode {0:?}, expected \"text\" or \"structured\"")]
    UnknownTableMode(String),
}
