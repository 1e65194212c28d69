//! Replacement handling
//!
//! A replacement is either a template string, where `$1`..`$9` refer to the
//! numbered groups, or a callback that computes the text for each match.
//! Any other `$` sequence, `$0` included, is copied as written.

/// Everything a replacement may refer to for one match
#[derive(Debug, Clone, Copy)]
pub struct ReplaceArgs<'a> {
    /// The matched text
    pub matched: &'a str,
    /// Captured groups in order; `None` if a group was never closed
    pub captures: &'a [Option<String>],
    /// Offset of the match in `input`
    pub index: usize,
    /// The whole text being searched
    pub input: &'a str,
}

impl ReplaceArgs<'_> {
    /// Text of group `n` (1-based). `None` if there is no such slot;
    /// `Some("")` for a slot that never closed.
    pub fn group(&self, n: usize) -> Option<&str> {
        self.captures
            .get(n.checked_sub(1)?)
            .map(|capture| capture.as_deref().unwrap_or(""))
    }
}

/// Produces the text substituted for each match
pub trait Replacer {
    fn replace(&mut self, args: &ReplaceArgs<'_>) -> String;
}

/// A part of a replacement template
#[derive(Debug, Clone, PartialEq)]
pub enum ReplacementPart {
    /// Literal text
    Literal(String),
    /// `$n`, for n in 1..=9
    Group(u8),
}

/// A parsed replacement template
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    parts: Vec<ReplacementPart>,
}

impl Replacement {
    /// Parse a replacement string. Every input is valid: a `$` that is not
    /// followed by a digit 1-9 is kept as written.
    pub fn parse(input: &str) -> Self {
        let mut parts = Vec::new();
        let mut chars = input.chars().peekable();
        let mut current_literal = String::new();

        while let Some(c) = chars.next() {
            let digit = match chars.peek() {
                Some(&next) if c == '$' => next.to_digit(10).filter(|&n| n != 0),
                _ => None,
            };
            match digit {
                Some(n) => {
                    chars.next();
                    if !current_literal.is_empty() {
                        parts.push(ReplacementPart::Literal(std::mem::take(
                            &mut current_literal,
                        )));
                    }
                    parts.push(ReplacementPart::Group(n as u8));
                }
                None => current_literal.push(c),
            }
        }

        if !current_literal.is_empty() {
            parts.push(ReplacementPart::Literal(current_literal));
        }

        Replacement { parts }
    }

    /// Apply the replacement to a match
    pub fn apply(&self, args: &ReplaceArgs<'_>) -> String {
        let mut result = String::new();

        for part in &self.parts {
            match part {
                ReplacementPart::Literal(text) => result.push_str(text),
                ReplacementPart::Group(n) => match args.group(*n as usize) {
                    Some(text) => result.push_str(text),
                    // No such group: the reference stays literal
                    None => {
                        result.push('$');
                        result.push(char::from(b'0' + n));
                    }
                },
            }
        }

        result
    }

    /// Get the parts of the replacement
    pub fn parts(&self) -> &[ReplacementPart] {
        &self.parts
    }
}

impl Replacer for Replacement {
    fn replace(&mut self, args: &ReplaceArgs<'_>) -> String {
        self.apply(args)
    }
}

impl Replacer for &Replacement {
    fn replace(&mut self, args: &ReplaceArgs<'_>) -> String {
        self.apply(args)
    }
}

impl Replacer for &str {
    fn replace(&mut self, args: &ReplaceArgs<'_>) -> String {
        Replacement::parse(self).apply(args)
    }
}

impl<F> Replacer for F
where
    F: FnMut(&ReplaceArgs<'_>) -> String,
{
    fn replace(&mut self, args: &ReplaceArgs<'_>) -> String {
        self(args)
    }
}
