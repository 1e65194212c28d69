//! Recursive backtracking matcher
//!
//! Walks the pattern text left to right against a subject cursor. Each
//! decision point recurses with its own copy of the [`Context`], so a failed
//! branch can never leave captures behind in a sibling. Alternation is
//! handled lazily: when a branch fails, the rest of the pattern is scanned for
//! the next `|` and matching restarts there from the attempt's start offset.

use log::debug;

use crate::captures::Captures;
use crate::class::{self, ClassScan};
use crate::cursor::{Subject, TextCursor};
use crate::error::{RegexError, Result};
use crate::limits::{CancelToken, MatchLimits};

/// Per-branch state, copied into every recursive call
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context {
    /// Subject offset this attempt started at
    start: usize,
    class: ClassScan,
    captures: Captures,
}

/// A successful attempt, before substrings are materialized
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attempt {
    pub end: usize,
    pub captures: Captures,
}

type Step = Result<Option<Attempt>>;

/// Per-search state shared by every branch of every attempt
pub(crate) struct Matcher<'a, S: Subject + ?Sized> {
    pattern: &'a str,
    subject: &'a S,
    ignore_case: bool,
    limits: MatchLimits,
    cancel: Option<&'a CancelToken>,
    depth: usize,
    aborted: bool,
}

impl<'a, S: Subject + ?Sized + 'a> Matcher<'a, S> {
    pub(crate) fn new(
        pattern: &'a str,
        subject: &'a S,
        ignore_case: bool,
        limits: MatchLimits,
        cancel: Option<&'a CancelToken>,
    ) -> Self {
        Matcher {
            pattern,
            subject,
            ignore_case,
            limits,
            cancel,
            depth: 0,
            aborted: false,
        }
    }

    /// Whether cancellation or the depth bound ended the search
    pub(crate) fn aborted(&self) -> bool {
        self.aborted
    }

    /// Try to match the whole pattern starting exactly at `start`
    pub(crate) fn attempt(&mut self, start: usize) -> Step {
        let ctx = Context {
            start,
            class: ClassScan::default(),
            captures: Captures::new(),
        };
        self.depth = 0;
        self.match_here(0, self.subject.cursor_at(start), ctx)
    }

    fn match_here(&mut self, pp: usize, cursor: S::Cursor<'a>, mut ctx: Context) -> Step {
        if self.aborted {
            return Ok(None);
        }
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            debug!("match of {:?} cancelled", self.pattern);
            self.aborted = true;
            return Ok(None);
        }
        if self.depth >= self.limits.max_depth {
            debug!(
                "match of {:?} abandoned at recursion depth {}",
                self.pattern, self.depth
            );
            self.aborted = true;
            return Ok(None);
        }

        self.depth += 1;
        let result = self.step(pp, cursor, &mut ctx);
        self.depth -= 1;
        result
    }

    /// One transition. `ctx` belongs to the calling `match_here` frame; every
    /// recursive call gets its own copy.
    fn step(&mut self, pp: usize, mut cursor: S::Cursor<'a>, ctx: &mut Context) -> Step {
        match self.pattern.as_bytes().get(pp) {
            None => Ok(Some(found(&cursor, ctx))),
            Some(b'|') => {
                if ctx.captures.depth() == 0 {
                    return Ok(Some(found(&cursor, ctx)));
                }
                // This alternative of the enclosing group is done; resume
                // after the group's closing parenthesis
                match self.scan_forward(pp + 1, &mut ctx.captures, b')')? {
                    Some(close) => self.match_here(close, cursor, *ctx),
                    None => Ok(Some(found(&cursor, ctx))),
                }
            }
            Some(b'^') => {
                if cursor.position() == 0 {
                    self.match_here(pp + 1, cursor, *ctx)
                } else {
                    self.no_match(pp + 1, ctx)
                }
            }
            Some(b'$') => {
                if cursor.has_more() {
                    self.no_match(pp + 1, ctx)
                } else {
                    self.match_here(pp + 1, cursor, *ctx)
                }
            }
            Some(b'(') => {
                ctx.captures.open(cursor.position());
                self.match_here(pp + 1, cursor, *ctx)
            }
            Some(b')') => {
                ctx.captures.close(cursor.position());
                self.match_here(pp + 1, cursor, *ctx)
            }
            Some(_) => {
                let atom = self.test_atom(pp, &cursor, ctx)?;
                let next = pp + atom.len;
                match self.pattern.as_bytes().get(next) {
                    Some(&op @ (b'*' | b'+')) => {
                        self.repeat(pp, next + 1, op, atom.matched, cursor, ctx)
                    }
                    _ if atom.matched => {
                        cursor.advance();
                        self.match_here(next, cursor, *ctx)
                    }
                    _ => self.no_match(next, ctx),
                }
            }
        }
    }

    fn test_atom(
        &self,
        pp: usize,
        cursor: &S::Cursor<'a>,
        ctx: &mut Context,
    ) -> Result<class::Atom> {
        class::match_atom(
            self.pattern,
            pp,
            cursor.peek(),
            self.ignore_case,
            &mut ctx.class,
        )
    }

    /// Greedy `*`/`+` over the atom at `atom`; `rest` is the pattern after
    /// the quantifier. The last successful continuation wins.
    fn repeat(
        &mut self,
        atom: usize,
        rest: usize,
        op: u8,
        mut matched: bool,
        cursor: S::Cursor<'a>,
        ctx: &mut Context,
    ) -> Step {
        if op == b'+' && !matched {
            return self.no_match(rest, ctx);
        }

        let mut best = if op == b'*' {
            self.match_here(rest, cursor.clone(), *ctx)?
        } else {
            None
        };

        let mut fork = cursor;
        while matched && !self.aborted {
            fork.advance();
            matched = self.test_atom(atom, &fork, ctx)?.matched;
            if let Some(attempt) = self.match_here(rest, fork.clone(), *ctx)? {
                best = Some(attempt);
            }
        }

        if self.aborted {
            return Ok(None);
        }
        Ok(best)
    }

    /// Local failure: restart from the next alternative, if there is one
    fn no_match(&mut self, pp: usize, ctx: &mut Context) -> Step {
        let Some(bar) = self.scan_forward(pp, &mut ctx.captures, b'|')? else {
            return Ok(None);
        };
        ctx.captures.forget_closed();
        ctx.class = ClassScan::default();
        let cursor = self.subject.cursor_at(ctx.start);
        self.match_here(bar + 1, cursor, *ctx)
    }

    /// Find the next `target` (`|` or `)`) at the current nesting level.
    ///
    /// Escapes and bracket classes are skipped; an unterminated class is an
    /// error even though it is never matched. Groups opened on the way are
    /// given slots so numbering follows the pattern text. When looking for
    /// `|`, a `)` of an enclosing group drops that group from the open set.
    fn scan_forward(
        &self,
        mut pp: usize,
        captures: &mut Captures,
        target: u8,
    ) -> Result<Option<usize>> {
        let bytes = self.pattern.as_bytes();
        let mut nesting = 0usize;

        while let Some(&b) = bytes.get(pp) {
            match b {
                b'\\' => pp += 1,
                b'[' => {
                    pp = self.class_end(pp)?;
                    continue;
                }
                b'(' => {
                    captures.open(pp);
                    nesting += 1;
                }
                b')' if nesting > 0 => {
                    captures.abandon();
                    nesting -= 1;
                }
                b')' if target == b')' => return Ok(Some(pp)),
                b')' => captures.abandon(),
                b'|' if nesting == 0 && target == b'|' => return Ok(Some(pp)),
                _ => {}
            }
            pp += 1;
        }
        Ok(None)
    }

    /// Offset just past the `]` closing the class at `pp`
    fn class_end(&self, pp: usize) -> Result<usize> {
        let bytes = self.pattern.as_bytes();
        let mut i = pp + 1;
        if bytes.get(i) == Some(&b'^') {
            i += 1;
        }
        loop {
            match bytes.get(i) {
                None => return Err(RegexError::UnterminatedClass { position: pp }),
                Some(b'\\') => i += 2,
                Some(b']') => return Ok(i + 1),
                Some(_) => i += 1,
            }
        }
    }
}

fn found<C: TextCursor>(cursor: &C, ctx: &Context) -> Attempt {
    Attempt {
        end: cursor.position(),
        captures: ctx.captures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Spans = Vec<Option<(usize, usize)>>;

    fn attempt(pattern: &str, subject: &str, start: usize) -> Option<(usize, Spans)> {
        let mut matcher = Matcher::new(pattern, subject, false, MatchLimits::default(), None);
        matcher
            .attempt(start)
            .unwrap()
            .map(|a| (a.end, a.captures.iter().collect()))
    }

    #[test]
    fn test_anchored_literal() {
        assert_eq!(attempt("ab", "abc", 0), Some((2, vec![])));
        assert_eq!(attempt("ab", "xab", 0), None);
        assert_eq!(attempt("ab", "xab", 1), Some((3, vec![])));
    }

    #[test]
    fn test_star_backs_off() {
        assert_eq!(attempt("a*ab", "aaab", 0), Some((4, vec![])));
        assert_eq!(attempt("a*", "aaab", 0), Some((3, vec![])));
        assert_eq!(attempt("a*", "bbb", 0), Some((0, vec![])));
    }

    #[test]
    fn test_plus_needs_one() {
        assert_eq!(attempt("a+", "bbb", 0), None);
        assert_eq!(attempt("a+a", "a", 0), None);
        assert_eq!(attempt("a+a", "aaa", 0), Some((3, vec![])));
    }

    #[test]
    fn test_groups() {
        assert_eq!(
            attempt("(a)(b)", "ab", 0),
            Some((2, vec![Some((0, 1)), Some((1, 2))]))
        );
        assert_eq!(
            attempt("((a)b)", "ab", 0),
            Some((2, vec![Some((0, 2)), Some((0, 1))]))
        );
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(attempt("(ab", "ab", 0), Some((2, vec![None])));
    }

    #[test]
    fn test_quantifier_after_group_is_literal() {
        assert_eq!(attempt("(a)*", "a*", 0), Some((2, vec![Some((0, 1))])));
        assert_eq!(attempt("(a)*", "aa", 0), None);
    }

    #[test]
    fn test_alternation() {
        assert_eq!(attempt("cat|dog", "dog", 0), Some((3, vec![])));
        assert_eq!(attempt("cat|dog", "cat", 0), Some((3, vec![])));
        assert_eq!(attempt("a|b|c", "c", 0), Some((1, vec![])));
        assert_eq!(attempt("a|b", "x", 0), None);
        assert_eq!(attempt(r"a\|b", "a|b", 0), Some((3, vec![])));
        assert_eq!(attempt("[|]x|y", "y", 0), Some((1, vec![])));
    }

    #[test]
    fn test_alternation_inside_group() {
        assert_eq!(attempt("(a|b)c", "ac", 0), Some((2, vec![Some((0, 1))])));
        assert_eq!(attempt("(a|b)c", "bc", 0), Some((2, vec![Some((0, 1))])));
        assert_eq!(
            attempt("(a)|(b)", "b", 0),
            Some((1, vec![None, Some((0, 1))]))
        );
        assert_eq!(
            attempt("(x(y))|(b)", "b", 0),
            Some((1, vec![None, None, Some((0, 1))]))
        );
        assert_eq!(
            attempt("((a)|b)", "b", 0),
            Some((1, vec![Some((0, 1)), None]))
        );
    }

    #[test]
    fn test_alternation_restarts_at_attempt_start() {
        // The second branch is retried from offset 0, not after the `x`
        assert_eq!(attempt("x(a|b)", "xb", 0), None);
    }

    #[test]
    fn test_anchors() {
        assert_eq!(attempt("^a", "a", 0), Some((1, vec![])));
        assert_eq!(attempt("^a", "ba", 1), None);
        assert_eq!(attempt("a$", "a", 0), Some((1, vec![])));
        assert_eq!(attempt("a$", "ab", 0), None);
        assert_eq!(attempt("^b|a", "ca", 1), Some((2, vec![])));
        assert_eq!(attempt("x$|x", "xy", 0), Some((1, vec![])));
    }

    #[test]
    fn test_depth_limit_aborts() {
        let subject = "a".repeat(64);
        let pattern = "a".repeat(64);
        let mut matcher = Matcher::new(
            pattern.as_str(),
            subject.as_str(),
            false,
            MatchLimits::with_max_depth(16),
            None,
        );
        assert!(matcher.attempt(0).unwrap().is_none());
        assert!(matcher.aborted());
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let mut matcher = Matcher::new("a", "a", false, MatchLimits::default(), Some(&token));
        assert!(matcher.attempt(0).unwrap().is_none());
        assert!(matcher.aborted());
    }

    #[test]
    fn test_error_unwinds_from_depth() {
        let mut matcher = Matcher::new("ab[c", "abc", false, MatchLimits::default(), None);
        assert!(matcher.attempt(0).is_err());
    }

    #[test]
    fn test_unterminated_class_while_skipping_to_alternative() {
        let mut matcher = Matcher::new("a[b|c", "c", false, MatchLimits::default(), None);
        assert!(matches!(
            matcher.attempt(0),
            Err(RegexError::UnterminatedClass { position: 1 })
        ));

        let mut matcher = Matcher::new("(a|[b)c", "ac", false, MatchLimits::default(), None);
        assert!(matcher.attempt(0).is_err());
    }
}
