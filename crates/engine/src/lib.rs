//! Form engine for formwork
//!
//! This crate ties the lower layers into form objects:
//! - FormSchema / SchemaBuilder: per-type field and owner registries
//! - Owner: capability contract for backing objects
//! - Form: one flat attribute surface over many owners
//! - Routing, validation aggregation, lifecycle hooks, and atomic save
//!
//! The engine is the only component that knows about:
//! - Which owner a field belongs to
//! - How owner outcomes fold into one result
//! - Phase ordering and transaction boundaries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod form;
pub mod lifecycle;
pub mod owner;
pub mod persistence;
pub mod registry;
pub mod router;
pub mod testing;
pub mod validation;

pub use config::{FormConfig, OwnerErrorMode, CONFIG_FILE_NAME};
pub use form::{Form, FormBuilder};
pub use lifecycle::{AroundHook, Hook, Hooks, PhaseHooks, PhaseReport, PhaseState, Proceed};
pub use owner::{ensure_capable, missing_capability, shared, Owner, SharedOwner};
pub use persistence::{SaveOptions, VALIDATE_OPTION};
pub use registry::{FieldOptions, FieldSpec, FormSchema, OwnerSlot, SchemaBuilder, SetupOptions};
pub use router::{route, Partition};
pub use validation::Rule;
