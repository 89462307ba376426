//! Square bracket matching.
//!
//! Indices are byte offsets into the input, except in [`paired_index`], which
//! counts characters. `[` and `]` are ASCII, so they never appear inside a
//! multi-byte sequence and every byte offset returned here is a valid char
//! boundary.

mod error;
mod pairs;

pub use error::{MatchError, SourceLocation};
pub use pairs::{BracketPair, matching_pairs};

const OPEN: char = '[';
const CLOSE: char = ']';

/// Outcome of a single left-to-right scan.
enum Scan {
    /// The opener was closed at this offset.
    Closed(usize),
    /// A `]` was seen while no `[` was open.
    StrayClose(usize),
    /// The input ran out first.
    Exhausted,
}

/// Scan positioned characters for the `]` that closes the `[` at `open_index`.
///
/// Positions are whatever unit the caller enumerates with. The top of the
/// stack is compared before it is popped. A `]` with an empty stack stops the
/// scan outright, even if the real match comes later.
fn scan(chars: impl IntoIterator<Item = (usize, char)>, open_index: usize) -> Scan {
    let mut stack: Vec<usize> = Vec::new();

    for (i, c) in chars {
        match c {
            OPEN => stack.push(i),
            CLOSE => match stack.last() {
                None => return Scan::StrayClose(i),
                Some(&top) if top == open_index => return Scan::Closed(i),
                Some(_) => {
                    stack.pop();
                }
            },
            _ => {}
        }
    }

    Scan::Exhausted
}

/// Find the index of the `]` paired with the `[` at `open_index`.
///
/// Returns `None` if `open_index` does not address a `[`, if no matching `]`
/// exists, or if a `]` with no open `[` appears before the match is reached.
#[must_use]
pub fn find_matching_close_index(text: &str, open_index: usize) -> Option<usize> {
    match scan(text.char_indices(), open_index) {
        Scan::Closed(close) => Some(close),
        Scan::StrayClose(_) | Scan::Exhausted => None,
    }
}

/// Sentinel form of [`find_matching_close_index`], indexed by character.
///
/// Both `open_index` and the result count characters, not bytes. Returns the
/// matching index, or `-1` for every failure. A negative `open_index` never
/// matches.
#[must_use]
pub fn paired_index(text: &str, open_index: isize) -> isize {
    let Ok(open) = usize::try_from(open_index) else {
        return -1;
    };

    match scan(text.chars().enumerate(), open) {
        Scan::Closed(close) => isize::try_from(close).unwrap_or(-1),
        Scan::StrayClose(_) | Scan::Exhausted => -1,
    }
}

/// Like [`find_matching_close_index`], but says why no match was found.
///
/// # Errors
///
/// Returns [`MatchError::NotAnOpener`] if there is no `[` at `open_index`,
/// [`MatchError::StrayClose`] if the scan met an unopened `]` first, and
/// [`MatchError::Unclosed`] if the input ended before the match.
pub fn locate_matching_close(text: &str, open_index: usize) -> Result<usize, MatchError> {
    if !text
        .get(open_index..)
        .is_some_and(|rest| rest.starts_with(OPEN))
    {
        return Err(MatchError::NotAnOpener { index: open_index });
    }

    match scan(text.char_indices(), open_index) {
        Scan::Closed(close) => Ok(close),
        Scan::StrayClose(position) => Err(MatchError::StrayClose { position }),
        Scan::Exhausted => Err(MatchError::Unclosed { index: open_index }),
    }
}
