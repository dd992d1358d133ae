//! Field-keyed validation error collection
//!
//! `Errors` accumulates validation messages the way a transaction's
//! validation result accumulates conflicts: every rule appends, nothing is
//! deduplicated, and the collection is valid only when empty.
//!
//! ## Ordering
//!
//! Fields keep the order in which their first message arrived. Messages for
//! one field keep their insertion order. The key [`Errors::BASE`] is reserved
//! for whole-object errors.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Insertion-ordered field → messages collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<(String, Vec<String>)>,
}

impl Errors {
    /// Field key reserved for errors about the object as a whole
    pub const BASE: &'static str = "base";

    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    /// Append a whole-object message
    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.add(Self::BASE, message);
    }

    /// Messages recorded for `field` (empty if none)
    pub fn get(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }

    /// True if `field` has at least one message
    pub fn contains(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// True if no messages were recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.len()).sum()
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Fields with messages, in first-seen order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    /// Iterate `(field, messages)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_slice()))
    }

    /// Append every message from `other`, preserving its order
    pub fn merge(&mut self, other: &Errors) {
        for (field, messages) in other.iter() {
            for message in messages {
                self.add(field, message.clone());
            }
        }
    }

    /// Display-ready messages: `"Field name message"`, base messages as-is
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| {
                    if field == Self::BASE {
                        m.clone()
                    } else {
                        format!("{} {}", humanize(field), m)
                    }
                })
            })
            .collect()
    }
}

/// `first_name` → `First name`
pub fn humanize(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl<F: Into<String>, M: Into<String>> FromIterator<(F, M)> for Errors {
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        let mut errors = Errors::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}
