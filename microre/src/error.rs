//! Error types for the regex engine
//!
//! Patterns are never validated ahead of time, so syntax errors are raised at
//! the point the matcher reaches the offending construct. Cancellation and
//! recursion exhaustion are not errors: they surface as "no match".

use thiserror::Error;

/// The main error type for the regex engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// A `[` with no closing `]`
    #[error("unterminated character class starting at position {position}")]
    UnterminatedClass {
        /// Byte offset of the opening `[` in the pattern
        position: usize,
    },

    /// A `\1`..`\9` escape
    #[error("backreference \\{group} at position {position} is not supported")]
    UnsupportedBackreference {
        /// The referenced group number
        group: u8,
        /// Byte offset of the `\` in the pattern
        position: usize,
    },

    /// A flag character other than `g` or `i`
    #[error("unknown regexp flag '{0}'")]
    InvalidFlag(char),
}

impl RegexError {
    /// Byte offset in the pattern where the error was detected, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            RegexError::UnterminatedClass { position }
            | RegexError::UnsupportedBackreference { position, .. } => Some(*position),
            RegexError::InvalidFlag(_) => None,
        }
    }
}

/// Result type alias for regex operations
pub type Result<T> = std::result::Result<T, RegexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unterminated_class_display() {
        let err = RegexError::UnterminatedClass { position: 3 };
        assert_eq!(
            err.to_string(),
            "unterminated character class starting at position 3"
        );
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_backreference_display() {
        let err = RegexError::UnsupportedBackreference {
            group: 2,
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "backreference \\2 at position 0 is not supported"
        );
    }

    #[test]
    fn test_invalid_flag() {
        let err = RegexError::InvalidFlag('y');
        assert_eq!(err.to_string(), "unknown regexp flag 'y'");
        assert_eq!(err.position(), None);
    }
}
