//! Error types for formwork
//!
//! This module defines the single error taxonomy used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Validation failures are NOT errors: they live in [`Errors`] and surface as
//! a `false` result. Only the forced save converts them into
//! [`FormError::RecordInvalid`].

use crate::errors::Errors;
use crate::types::{Capability, OwnerKey, Phase};
use thiserror::Error;

/// Result type alias for formwork operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Error types for formwork
#[derive(Debug, Error)]
pub enum FormError {
    /// A bound owner does not support a required capability
    #[error("owner '{slot}' of type {type_name} does not support #{capability}")]
    InvalidOwner {
        /// Offending slot
        slot: OwnerKey,
        /// Type name of the bound owner
        type_name: String,
        /// First missing capability
        capability: Capability,
    },

    /// Forced save failed; carries the form's error collection
    #[error("Validation failed: {0}")]
    RecordInvalid(Errors),

    /// Field is not declared on the form's schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Owner slot is not declared on the form's schema
    #[error("Unknown owner slot: {0}")]
    UnknownOwner(OwnerKey),

    /// Field access through an owner slot with nothing bound
    #[error("owner '{slot}' is not bound (accessing field '{field}')")]
    UnboundOwner {
        /// Unbound slot
        slot: OwnerKey,
        /// Field being accessed
        field: String,
    },

    /// Malformed schema declaration (programmer error at definition time)
    #[error("Invalid declaration: {0}")]
    Declaration(String),

    /// A lifecycle hook failed and aborted its phase
    #[error("{phase} hook failed: {message}")]
    Hook {
        /// Phase whose hook failed
        phase: Phase,
        /// Failure description
        message: String,
    },

    /// Owner-internal failure during bulk write or persist
    #[error("owner '{slot}' failed: {message}")]
    Owner {
        /// Owner slot (or owner type name when the slot is unknown)
        slot: String,
        /// Failure description
        message: String,
    },

    /// Unit-of-work failure
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FormError {
    /// Create a hook failure for `phase`
    pub fn hook(phase: Phase, message: impl Into<String>) -> Self {
        FormError::Hook {
            phase,
            message: message.into(),
        }
    }

    /// Create an owner-internal failure
    pub fn owner(slot: impl Into<String>, message: impl Into<String>) -> Self {
        FormError::Owner {
            slot: slot.into(),
            message: message.into(),
        }
    }

    /// Create a declaration error
    pub fn declaration(message: impl Into<String>) -> Self {
        FormError::Declaration(message.into())
    }

    /// The error collection carried by a forced-save failure
    pub fn errors(&self) -> Option<&Errors> {
        match self {
            FormError::RecordInvalid(errors) => Some(errors),
            _ => None,
        }
    }
}
