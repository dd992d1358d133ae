//! Attribute routing
//!
//! An incoming attribute map is partitioned by owner using the schema's field
//! registry. Each partition goes to exactly one place:
//!
//! - `self`: assigned onto the form's own fields, unfiltered
//! - a bound owner: handed to the owner's bulk setter, first restricted to
//!   the owner's writable fields when the input is untrusted
//! - an unbound owner: skipped
//!
//! Keys that match no declared field appear in no partition. Owners whose
//! partition is empty are not called.

use crate::form::Form;
use crate::registry::FormSchema;
use formwork_core::error::Result;
use formwork_core::types::OwnerKey;
use formwork_core::{Attributes, Input};
use tracing::{debug, trace, warn};

/// One owner's share of an input
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Destination slot
    pub owner: OwnerKey,
    /// Attributes routed to it
    pub attributes: Attributes,
}

/// Split `input` into per-owner partitions in registry order
///
/// Untrusted input is allow-listed to writable fields for every owner other
/// than `self`. Empty partitions are omitted.
///
/// The `self` partition is never filtered: untrusted input can set any
/// declared self field, writable or not. Callers that need the writable flag
/// enforced on self fields must filter the input before routing it.
pub fn route(schema: &FormSchema, input: &Input) -> Vec<Partition> {
    let mut partitions = Vec::new();

    for slot in schema.resolve_owners() {
        let key = slot.key();
        let fields = schema.fields_for_owner(key.as_str());
        let slice = match input.slice(&fields) {
            Input::Untrusted(params) if !slot.is_self() => {
                let permitted = params.permit(&schema.writable_fields_for_owner(key.as_str()));
                if permitted.len() < params.len() {
                    trace!(
                        owner = %key,
                        dropped = params.len() - permitted.len(),
                        "untrusted non-writable fields dropped"
                    );
                }
                permitted.into_map()
            }
            Input::Untrusted(params) => params.into_map(),
            Input::Trusted(map) => map,
        };
        if !slice.is_empty() {
            partitions.push(Partition {
                owner: key.clone(),
                attributes: slice,
            });
        }
    }

    if tracing::enabled!(tracing::Level::TRACE) {
        for name in input.as_map().keys().filter(|k| !schema.has_field(k)) {
            trace!(field = name.as_str(), "unknown field ignored");
        }
    }
    partitions
}

impl Form {
    /// Store `input` as the form's raw params and distribute it to owners
    ///
    /// # Errors
    ///
    /// Propagates the first owner-internal failure from a bulk setter.
    /// Partitions already applied stay applied.
    pub fn set_attributes(&mut self, input: impl Into<Input>) -> Result<()> {
        let input = input.into();
        let partitions = route(&self.schema, &input);
        debug!(
            form = self.schema.name(),
            filterable = input.is_filterable(),
            partitions = partitions.len(),
            "routing attributes"
        );
        self.params = input;

        for Partition { owner, attributes } in partitions {
            if owner.is_self() {
                self.values.extend(attributes);
                continue;
            }
            match self.owner(owner.as_str()) {
                Some(handle) => handle.lock().assign_attributes(attributes)?,
                None => warn!(form = self.schema.name(), %owner, "owner unbound, attributes not routed"),
            }
        }
        Ok(())
    }
}
