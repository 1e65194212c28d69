//! Top-level search and match results
//!
//! [`Regex`] holds the pattern text exactly as written; there is no compile
//! step. A search tries the matcher at every offset from the starting point
//! through the end of the subject (inclusive, so empty matches at the end are
//! found) and turns the first successful attempt into a [`Match`].

use std::borrow::Cow;

use log::trace;

use crate::cursor::{Subject, TextCursor};
use crate::error::Result;
use crate::limits::{CancelToken, MatchLimits};
use crate::matcher::{Attempt, Matcher};

/// A match result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The start position of the match
    pub start: usize,
    /// The end position of the match (exclusive)
    pub end: usize,
    /// One entry per capture slot; `None` if the group was never closed
    pub groups: Vec<Option<(usize, usize)>>,
}

impl Match {
    fn from_attempt(start: usize, attempt: Attempt) -> Self {
        Match {
            start,
            end: attempt.end,
            groups: attempt.captures.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the matched text
    pub fn as_str<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    /// Get the matched text from any subject
    pub fn text<'s, S: Subject + ?Sized>(&self, subject: &'s S) -> Cow<'s, str> {
        subject.substring(self.start, self.end)
    }

    /// Get a capture group by index (1-based; 0 is the whole match)
    pub fn group(&self, n: usize) -> Option<(usize, usize)> {
        match n {
            0 => Some((self.start, self.end)),
            n => self.groups.get(n - 1).copied().flatten(),
        }
    }

    /// Get the text of a capture group
    pub fn group_str<'a>(&self, input: &'a str, n: usize) -> Option<&'a str> {
        self.group(n).map(|(start, end)| &input[start..end])
    }
}

/// A pattern ready to be searched for
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    ignore_case: bool,
    limits: MatchLimits,
    cancel: Option<CancelToken>,
}

impl Regex {
    /// Wrap a pattern. Syntax is only checked as far as a search reaches.
    pub fn new(pattern: &str) -> Self {
        Regex {
            pattern: pattern.to_string(),
            ignore_case: false,
            limits: MatchLimits::default(),
            cancel: None,
        }
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.ignore_case = enabled;
        self
    }

    pub fn with_limits(mut self, limits: MatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Poll `token` during every search
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The pattern source
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.ignore_case
    }

    pub fn limits(&self) -> MatchLimits {
        self.limits
    }

    /// Check if the pattern matches anywhere in the input
    pub fn is_match<S: Subject + ?Sized>(&self, subject: &S) -> Result<bool> {
        Ok(self.find(subject)?.is_some())
    }

    /// Find the first match in the input
    pub fn find<S: Subject + ?Sized>(&self, subject: &S) -> Result<Option<Match>> {
        self.find_at(subject, 0)
    }

    /// Find the first match starting at or after `start`
    pub fn find_at<S: Subject + ?Sized>(&self, subject: &S, start: usize) -> Result<Option<Match>> {
        if start > subject.len() {
            return Ok(None);
        }

        let mut matcher = Matcher::new(
            &self.pattern,
            subject,
            self.ignore_case,
            self.limits,
            self.cancel.as_ref(),
        );
        let mut cursor = subject.cursor_at(start);
        loop {
            let offset = cursor.position();
            trace!("trying {:?} at offset {}", self.pattern, offset);
            if let Some(attempt) = matcher.attempt(offset)? {
                return Ok(Some(Match::from_attempt(offset, attempt)));
            }
            if matcher.aborted() || !cursor.has_more() {
                return Ok(None);
            }
            cursor.advance();
        }
    }

    /// Find all non-overlapping matches
    pub fn find_all<S: Subject + ?Sized>(&self, subject: &S) -> Result<Vec<Match>> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.find_at(subject, pos)? {
            pos = if m.is_empty() {
                let mut cursor = subject.cursor_at(m.end);
                if !cursor.has_more() {
                    matches.push(m);
                    break;
                }
                cursor.advance();
                cursor.position()
            } else {
                m.end
            };
            matches.push(m);
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegexError;
    use crate::limits::DEFAULT_MAX_DEPTH;

    #[test]
    fn test_regex_literal_match() {
        let regex = Regex::new("abc");
        assert!(regex.is_match("abc").unwrap());
        assert!(regex.is_match("xabcy").unwrap());
        assert!(!regex.is_match("ab").unwrap());
        assert!(!regex.is_match("xyz").unwrap());
    }

    #[test]
    fn test_regex_find() {
        let regex = Regex::new("Wo");
        let m = regex.find("Hello World").unwrap().unwrap();
        assert_eq!(m.start, 6);
        assert_eq!(m.end, 8);
        assert_eq!(m.as_str("Hello World"), "Wo");
    }

    #[test]
    fn test_regex_find_group() {
        let input = "Hello World";
        let m = Regex::new("W(o)rld").find(input).unwrap().unwrap();
        assert_eq!(m.as_str(input), "World");
        assert_eq!(m.group_str(input, 1), Some("o"));
        assert_eq!(m.group_str(input, 0), Some("World"));
        assert_eq!(m.group_str(input, 2), None);
        assert_eq!(m.start, 6);
    }

    #[test]
    fn test_empty_match_at_end() {
        let m = Regex::new("$").find("abc").unwrap().unwrap();
        assert_eq!((m.start, m.end), (3, 3));
        assert!(m.is_empty());
    }

    #[test]
    fn test_find_at_past_end() {
        assert_eq!(Regex::new("").find_at("ab", 3).unwrap(), None);
        assert!(Regex::new("").find_at("ab", 2).unwrap().is_some());
    }

    #[test]
    fn test_regex_find_all() {
        let matches = Regex::new("a").find_all("banana").unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[2].start, 5);
    }

    #[test]
    fn test_find_all_empty_matches_terminate() {
        let matches = Regex::new("x*").find_all("ab").unwrap();
        let starts: Vec<_> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 1, 2]);
    }

    #[test]
    fn test_case_insensitive() {
        let regex = Regex::new("[A-Z]").case_insensitive(true);
        assert!(regex.is_match("m").unwrap());
        assert!(!Regex::new("[A-Z]").is_match("m").unwrap());
    }

    #[test]
    fn test_multibyte_offsets() {
        let input = "héllo wörld";
        let m = Regex::new("w.r").find(input).unwrap().unwrap();
        assert_eq!(m.as_str(input), "wör");
        assert_eq!(m.start, 7);
    }

    #[test]
    fn test_syntax_error_surfaces() {
        let err = Regex::new("a[b").find("xyz").unwrap_err();
        assert_eq!(err, RegexError::UnterminatedClass { position: 1 });
    }

    #[test]
    fn test_cancelled_search_finds_nothing() {
        let token = CancelToken::new();
        let regex = Regex::new("a").with_cancel_token(token.clone());
        assert!(regex.is_match("a").unwrap());
        token.cancel();
        assert!(!regex.is_match("a").unwrap());
    }

    #[test]
    fn test_default_depth_bound_is_no_match() {
        let long = "a".repeat(DEFAULT_MAX_DEPTH + 100);
        assert_eq!(Regex::new(&long).find(long.as_str()).unwrap(), None);

        let short = "a".repeat(DEFAULT_MAX_DEPTH - 50);
        let m = Regex::new(&short).find(short.as_str()).unwrap().unwrap();
        assert_eq!(m.end, short.len());
    }

    #[test]
    fn test_depth_limit_finds_nothing() {
        let regex = Regex::new("abcdef").with_limits(MatchLimits::with_max_depth(3));
        assert_eq!(regex.find("abcdef").unwrap(), None);
        assert!(Regex::new("abcdef").is_match("abcdef").unwrap());
    }
}
