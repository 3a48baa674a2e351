//! Element escaping for the `/`-separated path format.
//!
//! Only two characters are reserved: the separator `/` and the escape
//! character `\`. Escaping prefixes each of them with `\`.
//!
//! | escaped input        | elements                     |
//! |----------------------|------------------------------|
//! | `this/is/a/path`     | `this`, `is`, `a`, `path`    |
//! | `this/is\/a/path`    | `this`, `is/a`, `path`       |
//! | `this/is\\/a/path`   | `this`, `is\`, `a`, `path`   |
//! | `this/is\\\/a/path`  | `this`, `is\/a`, `path`      |
//! | `this/is//a/path`    | `this`, `is`, `a`, `path`    |
//! | `this/is\//a/path`   | `this`, `is/`, `a`, `path`   |
//! | `this/is/a/path/`    | `this`, `is`, `a`, `path`    |
//! | `this/is/a/path\/`   | `this`, `is`, `a`, `path/`   |

use std::borrow::Cow;

use crate::error::{PathError, PathResult};

pub const ESCAPE_CHARACTER: char = '\\';
pub const PATH_SEPARATOR: char = '/';

fn is_reserved(c: char) -> bool {
    c == PATH_SEPARATOR || c == ESCAPE_CHARACTER
}

/// Escape every reserved character in a raw element. Elements without
/// reserved characters are returned as-is.
pub fn escape_element(element: &str) -> Cow<'_, str> {
    if !element.contains(is_reserved) {
        return Cow::Borrowed(element);
    }

    let mut out = String::with_capacity(element.len() + 4);
    for c in element.chars() {
        if is_reserved(c) {
            out.push(ESCAPE_CHARACTER);
        }
        out.push(c);
    }

    Cow::Owned(out)
}

/// Turn an escaped element back into its raw form.
///
/// The input must already have passed [`validate_escaped_element`]; on an
/// element that still contains escaped separators the result is ambiguous.
pub fn unescape(element: &str) -> String {
    let mut out = String::with_capacity(element.len());
    let mut prev_was_escape = false;

    for c in element.chars() {
        if c == ESCAPE_CHARACTER && !prev_was_escape {
            prev_was_escape = true;
            continue;
        }

        prev_was_escape = false;
        out.push(c);
    }

    out
}

/// Check that an escaped element (trailing separators already trimmed) has no
/// bare reserved characters and no escape character paired with anything
/// other than a reserved character.
pub fn validate_escaped_element(element: &str) -> PathResult<()> {
    let mut prev_was_escape = false;

    for c in element.chars() {
        if prev_was_escape {
            prev_was_escape = false;

            if !is_reserved(c) {
                return Err(PathError::BadEscapeSequence(c));
            }

            continue;
        }

        if c == ESCAPE_CHARACTER {
            prev_was_escape = true;
            continue;
        }

        if is_reserved(c) {
            return Err(PathError::UnescapedReservedCharacter(c));
        }
    }

    if prev_was_escape {
        return Err(PathError::TrailingEscapeCharacter);
    }

    Ok(())
}

/// Strip unescaped trailing separators from an escaped string.
///
/// A separator preceded by an odd run of escape characters is escaped and
/// stays in place.
pub fn trim_trailing_slash(mut element: &str) -> &str {
    while let Some(rest) = element.strip_suffix(PATH_SEPARATOR) {
        let escapes = rest
            .chars()
            .rev()
            .take_while(|&c| c == ESCAPE_CHARACTER)
            .count();

        if escapes % 2 != 0 {
            break;
        }

        element = rest;
    }

    element
}

/// Join already escaped elements with the path separator.
pub fn join<I, S>(elements: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, e) in elements.into_iter().enumerate() {
        if i > 0 {
            out.push(PATH_SEPARATOR);
        }
        out.push_str(e.as_ref());
    }
    out
}

/// Split an escaped string into its escaped elements.
///
/// Separators behind an even run of escape characters split; behind an odd
/// run they belong to the element. Leading, repeated, and trailing
/// separators never produce empty elements.
pub fn split(segment: &str) -> Vec<String> {
    let mut res = Vec::new();
    let mut num_escapes = 0usize;
    let mut start = 0usize;
    // Start as if a separator was just seen so a leading one is skipped.
    let mut prev_was_separator = true;

    for (i, c) in segment.char_indices() {
        if c == ESCAPE_CHARACTER {
            prev_was_separator = false;
            num_escapes += 1;
            continue;
        }

        if c != PATH_SEPARATOR || num_escapes % 2 != 0 {
            prev_was_separator = false;
            num_escapes = 0;
            continue;
        }

        if !prev_was_separator {
            res.push(segment[start..i].to_string());
        }

        start = i + c.len_utf8();
        prev_was_separator = true;
        num_escapes = 0;
    }

    if start < segment.len() {
        res.push(segment[start..].to_string());
    }

    res
}
