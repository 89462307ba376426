//! Error types for bracket matching.

use thiserror::Error;

/// A source location (line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number, counted in characters.
    pub column: usize,
}

impl SourceLocation {
    /// Compute line and column from a byte offset in `text`.
    ///
    /// Offsets at or past the end resolve to the position just after the last
    /// character.
    #[must_use]
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;

        for (i, c) in text.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Why no closing bracket was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The requested index does not hold a `[`.
    #[error("no opening bracket at offset {index}")]
    NotAnOpener {
        /// The requested index.
        index: usize,
    },
    /// A `]` with no open `[` was reached before the match.
    #[error("unmatched closing bracket at offset {position}")]
    StrayClose {
        /// Offset of the stray `]`.
        position: usize,
    },
    /// The input ended with the bracket still open.
    #[error("opening bracket at offset {index} is never closed")]
    Unclosed {
        /// Offset of the unclosed `[`.
        index: usize,
    },
}

impl MatchError {
    /// The byte offset this error points at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match *self {
            Self::NotAnOpener { index } | Self::Unclosed { index } => index,
            Self::StrayClose { position } => position,
        }
    }
}
