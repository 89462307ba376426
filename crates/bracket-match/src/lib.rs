//! Square bracket matching library.
//!
//! This library finds the `]` paired with a given `[`, using standard
//! nested-bracket semantics.

mod config;
mod matcher;

pub use config::{Config, ConfigError, OutputStyle};
pub use matcher::{
    BracketPair, MatchError, SourceLocation, find_matching_close_index, locate_matching_close,
    matching_pairs, paired_index,
};
