//! Script-facing pattern objects
//!
//! [`RegExp`] carries the flags and the persisted `last_index` a script sees,
//! and implements `exec`/`test`. The free functions implement the text-side
//! methods (`match`, `replace`, `replaceAll`, `split`) on top of it.

use std::fmt;

use crate::cursor::{Subject, TextCursor};
use crate::engine::{Match, Regex};
use crate::error::{RegexError, Result};
use crate::limits::{CancelToken, MatchLimits};
use crate::replace::{ReplaceArgs, Replacer};

/// Flags accepted after a pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Resume from `last_index` and iterate over every match (`g`)
    pub global: bool,
    /// Case-insensitive matching (`i`)
    pub ignore_case: bool,
}

impl Flags {
    /// Parse flags from a string like "gi"
    pub fn from_string(flags: &str) -> Result<Self> {
        let mut parsed = Flags::default();
        for c in flags.chars() {
            match c {
                'g' => parsed.global = true,
                'i' => parsed.ignore_case = true,
                other => return Err(RegexError::InvalidFlag(other)),
            }
        }
        Ok(parsed)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("g")?;
        }
        if self.ignore_case {
            f.write_str("i")?;
        }
        Ok(())
    }
}

/// The result of a successful `exec`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// The matched text
    pub matched: String,
    /// Captured groups in order; `None` if a group was never closed
    pub captures: Vec<Option<String>>,
    /// Offset of the match in the subject
    pub index: usize,
}

impl ExecResult {
    fn build<S: Subject + ?Sized>(m: &Match, subject: &S) -> Self {
        ExecResult {
            matched: m.text(subject).into_owned(),
            captures: m
                .groups
                .iter()
                .map(|group| group.map(|(start, end)| subject.substring(start, end).into_owned()))
                .collect(),
            index: m.start,
        }
    }

    /// Offset just past the match
    pub fn end(&self) -> usize {
        self.index + self.matched.len()
    }

    /// Text of group `n` (0 is the whole match)
    pub fn get(&self, n: usize) -> Option<&str> {
        match n {
            0 => Some(&self.matched),
            n => self.captures.get(n - 1)?.as_deref(),
        }
    }
}

/// A pattern object as seen by scripts
#[derive(Debug, Clone)]
pub struct RegExp {
    regex: Regex,
    flags: Flags,
    last_index: usize,
}

impl RegExp {
    /// Create a pattern object. Only the flags are validated here.
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        let flags = Flags::from_string(flags)?;
        Ok(RegExp {
            regex: Regex::new(source).case_insensitive(flags.ignore_case),
            flags,
            last_index: 0,
        })
    }

    pub fn with_limits(mut self, limits: MatchLimits) -> Self {
        self.regex = self.regex.with_limits(limits);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.regex = self.regex.with_cancel_token(token);
        self
    }

    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_global(&self) -> bool {
        self.flags.global
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn set_last_index(&mut self, last_index: usize) {
        self.last_index = last_index;
    }

    /// Search `text`, resuming from `last_index` when the pattern is global
    pub fn exec<S: Subject + ?Sized>(&mut self, text: &S) -> Result<Option<ExecResult>> {
        self.exec_with(text, self.flags.global)
    }

    /// Whether `exec` would find a match. Updates `last_index` the same way.
    pub fn test<S: Subject + ?Sized>(&mut self, text: &S) -> Result<bool> {
        Ok(self.exec(text)?.is_some())
    }

    fn exec_with<S: Subject + ?Sized>(
        &mut self,
        text: &S,
        global: bool,
    ) -> Result<Option<ExecResult>> {
        let start = if global { self.last_index } else { 0 };
        let Some(m) = self.regex.find_at(text, start)? else {
            self.last_index = 0;
            return Ok(None);
        };

        self.last_index = match (global, m.is_empty()) {
            (false, _) => 0,
            (true, false) => m.end,
            // Step over one character so the next call makes progress
            (true, true) => {
                let mut cursor = text.cursor_at(m.end);
                if cursor.has_more() {
                    cursor.advance();
                    cursor.position()
                } else {
                    m.end + 1
                }
            }
        };

        Ok(Some(ExecResult::build(&m, text)))
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source(), self.flags)
    }
}

/// Outcome of `text.match(regexp)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrMatch {
    /// Non-global pattern: the full result of the first match
    First(ExecResult),
    /// Global pattern: every matched substring
    All(Vec<String>),
}

/// `text.match(regexp)`. `None` when nothing matched.
pub fn str_match(text: &str, regexp: &mut RegExp) -> Result<Option<StrMatch>> {
    if !regexp.is_global() {
        return Ok(regexp.exec(text)?.map(StrMatch::First));
    }

    regexp.last_index = 0;
    let collected = collect_matches(text, regexp);
    regexp.last_index = 0;
    let all = collected?;

    Ok((!all.is_empty()).then_some(StrMatch::All(all)))
}

fn collect_matches(text: &str, regexp: &mut RegExp) -> Result<Vec<String>> {
    let mut all = Vec::new();
    while let Some(result) = regexp.exec_with(text, true)? {
        all.push(result.matched);
    }
    Ok(all)
}

/// `text.replace(regexp, replacer)`: the first match, or every match when
/// the pattern is global
pub fn replace<R: Replacer>(text: &str, regexp: &mut RegExp, replacer: R) -> Result<String> {
    let global = regexp.is_global();
    replace_matches(text, regexp, global, replacer)
}

/// `text.replaceAll(regexp, replacer)`: every match, whatever the flags
pub fn replace_all<R: Replacer>(text: &str, regexp: &mut RegExp, replacer: R) -> Result<String> {
    replace_matches(text, regexp, true, replacer)
}

fn replace_matches<R: Replacer>(
    text: &str,
    regexp: &mut RegExp,
    global: bool,
    mut replacer: R,
) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    if global {
        regexp.last_index = 0;
    }
    while let Some(found) = regexp.exec_with(text, global)? {
        result.push_str(&text[last..found.index]);
        result.push_str(&replacer.replace(&ReplaceArgs {
            matched: &found.matched,
            captures: &found.captures,
            index: found.index,
            input: text,
        }));
        last = found.end();
        if !global {
            break;
        }
    }
    result.push_str(&text[last..]);
    regexp.last_index = 0;

    Ok(result)
}

/// `text.split(regexp)`. Empty matches never split at the same place twice.
pub fn split(text: &str, regexp: &RegExp) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut last = 0;
    let mut pos = 0;

    while pos < text.len() {
        let Some(m) = regexp.regex.find_at(text, pos)? else {
            break;
        };
        if m.start >= text.len() {
            break;
        }
        if m.end == last {
            // Empty match where the previous piece ended
            let mut cursor = text.cursor_at(m.start);
            cursor.advance();
            pos = cursor.position();
            continue;
        }
        parts.push(text[last..m.start].to_string());
        last = m.end;
        pos = m.end;
    }
    parts.push(text[last..].to_string());

    Ok(parts)
}
