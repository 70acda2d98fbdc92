//! Header input, validation and the case-insensitive header mapping.

use std::collections::HashSet;

use crate::constants::X_DUO_PREFIX;
use crate::{Error, Result};

/// Fold a header name for comparison.
///
/// Every lookup, duplicate check and canonicalization site compares names
/// through this function.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Check if the header participates in signing, i.e. its name starts with
/// `x-duo` ignoring case.
pub fn is_x_duo_header(name: &str) -> bool {
    name.as_bytes()
        .get(..X_DUO_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(X_DUO_PREFIX.as_bytes()))
}

/// Headers as handed over by the caller, before validation.
///
/// Entries keep their order and may lack a name or a value, for example
/// when they come from a `name: value` line that had no colon. Use
/// [`validate_headers`] to turn them into [`Headers`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncheckedHeaders {
    entries: Vec<(Option<String>, Option<String>)>,
}

impl UncheckedHeaders {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((Some(name.into()), Some(value.into())));
        self
    }

    /// Append an entry whose name or value may be absent.
    pub fn insert_raw(&mut self, name: Option<String>, value: Option<String>) -> &mut Self {
        self.entries.push((name, value));
        self
    }

    /// Append a header from a `Name: value` line.
    ///
    /// Surrounding whitespace is trimmed. A line without `:` yields an entry
    /// without value, an empty name yields an entry without name.
    pub fn insert_line(&mut self, line: &str) -> &mut Self {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (line.trim(), None),
        };
        let name = (!name.is_empty()).then(|| name.to_string());

        self.insert_raw(name, value)
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_deref(), v.as_deref()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UncheckedHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = UncheckedHeaders::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// Validated headers.
///
/// Names keep the case they were given in, but all lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first value whose name matches `name` ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = fold_name(name);
        self.entries
            .iter()
            .find(|(k, _)| fold_name(k) == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a header named `name` exists, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`.
    ///
    /// Every existing entry matching `name` ignoring case is dropped first,
    /// and the new entry is appended with the given spelling.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.entries.push((name, value.into()));
    }

    /// Remove every entry matching `name` ignoring case, returning the
    /// first removed value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = fold_name(name);
        let mut removed = None;
        self.entries.retain_mut(|(k, v)| {
            if fold_name(k) != name {
                return true;
            }
            if removed.is_none() {
                removed = Some(std::mem::take(v));
            }
            false
        });
        removed
    }

    /// Extract the headers that take part in signing.
    pub fn x_duo_headers(&self) -> Headers {
        Headers {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| is_x_duo_header(k))
                .cloned()
                .collect(),
        }
    }

    /// Iterate over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Validate caller supplied headers.
///
/// All problems are collected and reported together in one
/// [`ErrorKind::HeaderInvalid`](crate::ErrorKind::HeaderInvalid) error, one
/// line per problem:
///
/// - an entry without name or without value
/// - a NUL character in a name or value
/// - two x-duo headers whose names are equal ignoring case
///
/// Headers not starting with `x-duo` may repeat. On success the entries are
/// returned as [`Headers`], unchanged and in order.
pub fn validate_headers(headers: Option<&UncheckedHeaders>) -> Result<Headers> {
    let Some(headers) = headers else {
        return Ok(Headers::new());
    };

    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(headers.len());

    for (name, value) in headers.iter() {
        let Some(name) = name else {
            problems.push("missing header name is not valid".to_string());
            continue;
        };
        let Some(value) = value else {
            problems.push(format!("missing header value is not valid for header {name}"));
            continue;
        };
        if name.contains('\0') {
            problems.push(format!("null characters are not valid in header name {name:?}"));
            continue;
        }
        if value.contains('\0') {
            problems.push(format!("null characters are not valid in header value {value:?}"));
            continue;
        }

        let folded = fold_name(name);
        if is_x_duo_header(&folded) && !seen.insert(folded.clone()) {
            problems.push(format!(
                "duplicate x-duo headers are not supported, {folded} is duplicated"
            ));
            continue;
        }

        validated.push((name.to_string(), value.to_string()));
    }

    if !problems.is_empty() {
        return Err(Error::header_invalid(problems.join("\n")));
    }

    Ok(Headers { entries: validated })
}
