use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};

use crate::escape::{escape_element, join, split, unescape};
use crate::taxonomy::{CategoryType, ServiceType};

/// Placeholder written in place of any element that may carry PII.
pub const CONCEALED: &str = "***";

/// An ordered list of raw (unescaped) path elements.
///
/// `Display` renders the escaped form, which is the durable string identity.
/// Use [`Elements::conceal`] for anything that ends up in logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Elements(Vec<String>);

impl Elements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw elements joined by the separator, without escaping.
    pub fn plain_string(&self) -> String {
        join(&self.0)
    }

    /// Every element replaced by [`CONCEALED`].
    pub fn conceal(&self) -> String {
        join(self.0.iter().map(|_| CONCEALED))
    }

    /// Each element in escaped form.
    pub fn escaped(&self) -> Vec<String> {
        self.0.iter().map(|e| escape_element(e).into_owned()).collect()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub(crate) fn push(&mut self, element: String) {
        self.0.push(element);
    }
}

impl Deref for Elements {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Elements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(self.0.iter().map(|e| escape_element(e))))
    }
}

impl From<Vec<String>> for Elements {
    fn from(v: Vec<String>) -> Self {
        Elements(v)
    }
}

impl From<&[String]> for Elements {
    fn from(v: &[String]) -> Self {
        Elements(v.to_vec())
    }
}

impl<S: Into<String>> FromIterator<S> for Elements {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Elements(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Elements {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Elements {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialEq<[&str]> for Elements {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Elements {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

// Serialises as the raw element list.
impl Serialize for Elements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Conceal an escaped path string that may not parse.
///
/// Known service and category tokens stay readable; every other element is
/// replaced by [`CONCEALED`].
pub fn conceal_escaped(s: &str) -> String {
    join(split(s).iter().map(|e| {
        let raw = unescape(e);
        if is_known_token(&raw) {
            raw
        } else {
            CONCEALED.to_string()
        }
    }))
}

fn is_known_token(raw: &str) -> bool {
    matches!(raw.parse::<ServiceType>(), Ok(s) if s != ServiceType::Unknown)
        || matches!(raw.parse::<CategoryType>(), Ok(c) if c != CategoryType::Unknown)
}
