//! Collecting every matched pair in one pass.

use super::{CLOSE, OPEN};

/// An opening bracket and the closing bracket paired with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    /// Offset of the `[`.
    pub open: usize,
    /// Offset of the matching `]`.
    pub close: usize,
}

impl BracketPair {
    /// The bracketed text, both brackets included.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.open..=self.close]
    }
}

/// Every pair that [`find_matching_close_index`](super::find_matching_close_index)
/// would report for `text`, ordered by closing bracket.
///
/// Stops at the first `]` with no open `[`, since no opener can be matched past
/// that point.
#[must_use]
pub fn matching_pairs(text: &str) -> Vec<BracketPair> {
    let mut stack = Vec::new();
    let mut pairs = Vec::new();

    for (i, c) in text.char_indices() {
        match c {
            OPEN => stack.push(i),
            CLOSE => match stack.pop() {
                Some(open) => pairs.push(BracketPair { open, close: i }),
                None => break,
            },
            _ => {}
        }
    }

    pairs
}
