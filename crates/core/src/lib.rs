//! Core types for formwork
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / Attributes: dynamic field values and bulk attribute maps
//! - Input / UntrustedParams: trusted vs. allow-listed attribute input
//! - Errors: field-keyed validation message collection
//! - OwnerKey, Capability, Phase: identifiers shared by the engine
//! - FormError: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod errors;
pub mod input;
pub mod types;
pub mod value;

pub use error::{FormError, Result};
pub use errors::{humanize, Errors};
pub use input::{Input, UntrustedParams};
pub use types::{Capability, OwnerKey, Phase};
pub use value::{Attributes, Value};
