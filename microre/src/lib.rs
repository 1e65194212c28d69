//! microre
//!
//! A small backtracking regex engine for embedded script runtimes. Patterns
//! are matched straight from their source text with no compile step, trading
//! a little speed for almost no memory.

pub mod captures;
mod class;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod limits;
mod matcher;
pub mod regexp;
pub mod replace;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use captures::{Captures, Group, MAX_GROUPS};
pub use cursor::{StrCursor, Subject, TextCursor};
pub use engine::{Match, Regex};
pub use error::{RegexError, Result};
pub use limits::{CancelToken, DEFAULT_MAX_DEPTH, MatchLimits};
pub use regexp::{ExecResult, Flags, RegExp, StrMatch, replace, replace_all, split, str_match};
pub use replace::{ReplaceArgs, Replacement, ReplacementPart, Replacer};
