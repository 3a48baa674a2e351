//! Immutable accumulator of raw path elements.
//!
//! Every operation that looks like a mutation returns a new `Builder`, so a
//! builder can be shared across threads freely. The only exception is
//! [`Builder::update_parent`], which rewrites in place and needs exclusive
//! access (`&mut self`).

use std::fmt;

use sha2::{Digest, Sha256};

use crate::elements::Elements;
use crate::error::PathResult;
use crate::escape::{split, trim_trailing_slash, unescape, validate_escaped_element};

/// Number of hex characters in a short reference.
pub const SHORT_REF_CHARACTERS: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Builder {
    elements: Elements,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy this builder and append raw elements. Empty elements are skipped.
    pub fn append<I, S>(&self, elements: I) -> Builder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut res = self.clone();
        for e in elements {
            let e = e.as_ref();
            if !e.is_empty() {
                res.elements.push(e.to_string());
            }
        }
        res
    }

    /// Copy this builder and append escaped elements, unescaping each one.
    ///
    /// Nothing is returned unless every element is validly escaped.
    pub fn unescape_and_append<I, S>(&self, elements: I) -> PathResult<Builder>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut res = self.clone();
        for e in elements {
            let trimmed = trim_trailing_slash(e.as_ref());
            // An element that was only separators is empty now.
            if trimmed.is_empty() {
                continue;
            }

            validate_escaped_element(trimmed)?;
            res.elements.push(unescape(trimmed));
        }
        Ok(res)
    }

    /// Split an escaped directory string and append its elements.
    pub fn split_unescape_append(&self, s: &str) -> PathResult<Builder> {
        self.unescape_and_append(split(trim_trailing_slash(s)))
    }

    /// Drop the last element. A builder with one element or fewer becomes
    /// empty.
    pub fn dir(&self) -> Builder {
        if self.elements.len() <= 1 {
            return Builder::new();
        }

        Builder {
            elements: Elements::from(&self.elements[..self.elements.len() - 1]),
        }
    }

    /// Drop the first element. A builder with one element or fewer becomes
    /// empty.
    pub fn pop_front(&self) -> Builder {
        if self.elements.len() <= 1 {
            return Builder::new();
        }

        Builder {
            elements: Elements::from(&self.elements[1..]),
        }
    }

    /// Replace the leading `prev` elements with `cur` if `prev` is a
    /// positional prefix of this builder. Returns whether the prefix matched.
    ///
    /// An empty `prev` matches everything, so `cur` is prepended. An empty
    /// `cur` strips the prefix.
    ///
    /// Mutates in place: callers must hold the builder exclusively.
    pub fn update_parent(&mut self, prev: &Builder, cur: &Builder) -> bool {
        if prev.len() > self.len() {
            return false;
        }

        if !self.elements.starts_with(&prev.elements) {
            return false;
        }

        let mut updated: Vec<String> = cur.elements.to_vec();
        updated.extend_from_slice(&self.elements[prev.len()..]);
        self.elements = updated.into();

        true
    }

    /// A short, stable identifier for this element sequence.
    ///
    /// Hashes the escaped form so that `["a/b"]` and `["a", "b"]` differ.
    /// Empty builders have an empty short ref.
    pub fn short_ref(&self) -> String {
        if self.elements.is_empty() {
            return String::new();
        }

        let sum = Sha256::digest(self.elements.to_string().as_bytes());

        let mut s = String::with_capacity(SHORT_REF_CHARACTERS);
        for byte in &sum[..SHORT_REF_CHARACTERS / 2] {
            s.push_str(&format!("{:02x}", byte));
        }
        s
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn last_elem(&self) -> Option<&str> {
        self.elements.last()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn conceal(&self) -> String {
        self.elements.conceal()
    }

    pub fn plain_string(&self) -> String {
        self.elements.plain_string()
    }

    /// New builder with `prefix` ahead of this builder's elements.
    pub(crate) fn with_prefix<I, S>(&self, prefix: I) -> Builder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Builder::new().append(prefix).append(&self.elements)
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.elements, f)
    }
}

impl From<Elements> for Builder {
    fn from(elements: Elements) -> Self {
        Builder::new().append(&elements)
    }
}
