//! Line Classification
//!
//! Decides, for a single source line and without any context, whether it opens
//! a unit, closes one, or is ordinary text. The extractor's state machine is
//! driven entirely by these tags, so this module does no I/O.

use crate::fsplit::extract::unit::{Declarator, Keyword};
use once_cell::sync::Lazy;
use regex::Regex;

/// A declarator keyword as the first token, then either a name token or
/// nothing at all. `programx` or `function(x)` do not match.
static DECLARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(program|subroutine|function|block)(?:\s+(\S+)|\s*$)").unwrap()
});

/// Tag attached to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Anything that neither opens nor closes a unit.
    Ordinary,
    /// A bare `end`, case-insensitive, surrounding whitespace ignored.
    Terminator,
    /// Opens a unit.
    Declarator(Declarator),
    /// Starts with a declarator keyword but carries no usable name.
    IncompleteDeclarator(Keyword),
}

/// Determine the class of a line.
///
/// Order matters: the terminator check runs first, then the declarator
/// pattern, and everything else is ordinary.
pub fn classify_line(line: &str) -> LineClass {
    if is_terminator(line) {
        return LineClass::Terminator;
    }

    let Some(captures) = DECLARATOR_REGEX.captures(line) else {
        return LineClass::Ordinary;
    };

    // The pattern only admits the four keywords.
    let Some(keyword) = Keyword::from_token(&captures[1]) else {
        return LineClass::Ordinary;
    };

    let Some(token) = captures.get(2).map(|m| m.as_str()) else {
        return LineClass::IncompleteDeclarator(keyword);
    };

    match unit_name(keyword, token) {
        Some(name) => LineClass::Declarator(Declarator::new(keyword, name)),
        None => LineClass::IncompleteDeclarator(keyword),
    }
}

/// Check if the trimmed line is exactly `end`
pub fn is_terminator(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("end")
}

/// Name carried by the token following the keyword.
///
/// Subroutines and functions drop everything from the first `(`; programs and
/// block-data units keep the token verbatim. A name containing a path
/// separator is unusable, since the name becomes a file in the output
/// directory.
fn unit_name(keyword: Keyword, token: &str) -> Option<&str> {
    let name = if keyword.strips_arguments() {
        token.split('(').next().unwrap_or_default()
    } else {
        token
    };

    (!name.is_empty() && !name.contains(['/', '\\'])).then_some(name)
}
