//! Identifier and enumeration types shared by every layer
//!
//! This module defines:
//! - OwnerKey: name of an owner slot, with the reserved `self` slot
//! - Capability: one operation of the owner contract
//! - Phase: one of the three lifecycle phases of a form

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// OwnerKey
// ============================================================================

/// Name of an owner slot
///
/// The key `"self"` is reserved for the form instance's own fields and is
/// always present in a resolved owner list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Raw name of the implicit self slot
    pub const SELF: &'static str = "self";

    /// Create a key from any string-like value
    pub fn new(key: impl Into<String>) -> Self {
        OwnerKey(key.into())
    }

    /// The implicit self slot
    pub fn self_slot() -> Self {
        OwnerKey(Self::SELF.to_string())
    }

    /// True if this is the implicit self slot
    pub fn is_self(&self) -> bool {
        self.0 == Self::SELF
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerKey {
    fn from(s: &str) -> Self {
        OwnerKey(s.to_string())
    }
}

impl From<String> for OwnerKey {
    fn from(s: String) -> Self {
        OwnerKey(s)
    }
}

impl From<&OwnerKey> for OwnerKey {
    fn from(k: &OwnerKey) -> Self {
        k.clone()
    }
}

impl Borrow<str> for OwnerKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for OwnerKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for OwnerKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Capability
// ============================================================================

/// One operation of the owner contract
///
/// A bound owner must support all four before any attribute is routed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Bulk attribute read
    ReadAttributes,
    /// Bulk attribute write
    WriteAttributes,
    /// Validity check with per-field messages
    Validate,
    /// Persist operation reporting success
    Persist,
}

impl Capability {
    /// All capabilities, in the order they are checked
    pub const ALL: [Capability; 4] = [
        Capability::ReadAttributes,
        Capability::WriteAttributes,
        Capability::Validate,
        Capability::Persist,
    ];

    /// Short identifier used in messages
    pub const fn id(&self) -> &'static str {
        match self {
            Capability::ReadAttributes => "attributes",
            Capability::WriteAttributes => "assign_attributes",
            Capability::Validate => "validate",
            Capability::Persist => "persist",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Phase
// ============================================================================

/// Lifecycle phase of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Construction: params stored, owners bound, attributes routed
    Initialize,
    /// Own rules plus owner validation
    Validation,
    /// Owner persistence inside one transaction
    Save,
}

impl Phase {
    /// All phases
    pub const ALL: [Phase; 3] = [Phase::Initialize, Phase::Validation, Phase::Save];

    /// Short identifier
    pub const fn id(&self) -> &'static str {
        match self {
            Phase::Initialize => "initialize",
            Phase::Validation => "validation",
            Phase::Save => "save",
        }
    }

    /// Parse from short identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Phase::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
