//! Single-atom matching
//!
//! Decides whether the atom starting at a pattern offset accepts one
//! character, and how many pattern bytes the atom spans. Atoms are `.`,
//! bracket classes, escapes and literal characters. Nothing is compiled: the
//! pattern text is scanned again every time an atom is tested.

use crate::error::{RegexError, Result};

/// Sub-state carried while scanning the members of a bracket class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassScan {
    in_class: bool,
    /// Lower bound of a range whose upper bound is being scanned
    range_start: Option<char>,
}

/// Outcome of testing one atom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    pub matched: bool,
    /// Length of the atom in pattern bytes
    pub len: usize,
}

enum Escape {
    Class(fn(char) -> bool),
    Char(char, usize),
}

/// Test the atom at `pattern[pp..]` against `c`.
///
/// `c` is `None` when the subject is exhausted; the atom is still scanned so
/// its length is known and syntax errors are reported.
pub fn match_atom(
    pattern: &str,
    pp: usize,
    c: Option<char>,
    ignore_case: bool,
    scan: &mut ClassScan,
) -> Result<Atom> {
    match pattern.as_bytes().get(pp) {
        Some(b'.') if !scan.in_class => Ok(Atom {
            matched: c.is_some(),
            len: 1,
        }),
        Some(b'[') if !scan.in_class => match_class(pattern, pp, c, ignore_case, scan),
        _ => match_single(pattern, pp, c, ignore_case, scan),
    }
}

fn match_class(
    pattern: &str,
    pp: usize,
    c: Option<char>,
    ignore_case: bool,
    scan: &mut ClassScan,
) -> Result<Atom> {
    let bytes = pattern.as_bytes();
    let negated = bytes.get(pp + 1) == Some(&b'^');
    let mut len = if negated { 2 } else { 1 };

    *scan = ClassScan {
        in_class: true,
        range_start: None,
    };
    let mut any = false;
    loop {
        match bytes.get(pp + len) {
            None => {
                *scan = ClassScan::default();
                return Err(RegexError::UnterminatedClass { position: pp });
            }
            Some(b']') => {
                len += 1;
                break;
            }
            Some(_) => {
                let member = match_single(pattern, pp + len, c, ignore_case, scan)?;
                any |= member.matched;
                len += member.len;
            }
        }
    }
    *scan = ClassScan::default();

    Ok(Atom {
        matched: c.is_some() && any != negated,
        len,
    })
}

fn match_single(
    pattern: &str,
    pp: usize,
    c: Option<char>,
    ignore_case: bool,
    scan: &mut ClassScan,
) -> Result<Atom> {
    let Some(first) = pattern[pp..].chars().next() else {
        return Ok(Atom {
            matched: false,
            len: 0,
        });
    };

    let (literal, len) = if first == '\\' {
        match parse_escape(pattern, pp)? {
            Escape::Class(test) => {
                scan.range_start = None;
                return Ok(Atom {
                    matched: c.is_some_and(test),
                    len: 2,
                });
            }
            Escape::Char(ch, len) => (ch, len),
        }
    } else {
        (first, first.len_utf8())
    };

    let bytes = pattern.as_bytes();
    if scan.in_class
        && scan.range_start.is_none()
        && bytes.get(pp + len) == Some(&b'-')
        && !matches!(bytes.get(pp + len + 1), None | Some(b']'))
    {
        scan.range_start = Some(literal);
        let upper = match_single(pattern, pp + len + 1, c, ignore_case, scan)?;
        scan.range_start = None;
        return Ok(Atom {
            matched: upper.matched,
            len: len + 1 + upper.len,
        });
    }

    let low = scan.range_start.take();
    let Some(c) = c else {
        return Ok(Atom {
            matched: false,
            len,
        });
    };
    let (c, literal, low) = if ignore_case {
        (fold(c), fold(literal), low.map(fold))
    } else {
        (c, literal, low)
    };

    let matched = match low {
        Some(low) => low < literal && (low..=literal).contains(&c),
        None => c == literal,
    };
    Ok(Atom { matched, len })
}

fn parse_escape(pattern: &str, pp: usize) -> Result<Escape> {
    let Some(next) = pattern[pp + 1..].chars().next() else {
        // A trailing backslash stands for itself
        return Ok(Escape::Char('\\', 1));
    };

    let escape = match next {
        'd' => Escape::Class(is_digit),
        'D' => Escape::Class(|c| !is_digit(c)),
        's' => Escape::Class(is_space),
        'S' => Escape::Class(|c| !is_space(c)),
        'w' => Escape::Class(is_word),
        'W' => Escape::Class(|c| !is_word(c)),
        'n' => Escape::Char('\n', 2),
        'r' => Escape::Char('\r', 2),
        't' => Escape::Char('\t', 2),
        'v' => Escape::Char('\u{0B}', 2),
        'f' => Escape::Char('\u{0C}', 2),
        'b' => Escape::Char('\u{08}', 2),
        '0' => Escape::Char('\0', 2),
        'x' => match hex_byte(pattern.as_bytes(), pp + 2) {
            Some(byte) => Escape::Char(char::from(byte), 4),
            None => Escape::Char('x', 2),
        },
        '1'..='9' => {
            return Err(RegexError::UnsupportedBackreference {
                group: next as u8 - b'0',
                position: pp,
            });
        }
        other => Escape::Char(other, 1 + other.len_utf8()),
    };
    Ok(escape)
}

fn hex_byte(bytes: &[u8], at: usize) -> Option<u8> {
    let hi = char::from(*bytes.get(at)?).to_digit(16)?;
    let lo = char::from(*bytes.get(at + 1)?).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// ASCII only, like `\d` and `\w`. Includes vertical tab.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}')
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Simple lowercase folding; characters with multi-char lowercase forms are
/// left alone.
pub(crate) fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}
