//! Owner capability contract
//!
//! An owner is an external object holding part of a form's data. The form
//! references owners, it never owns them: callers keep their own handle to
//! the `Arc` and observe the form's writes through it.

use formwork_core::error::{FormError, Result};
use formwork_core::types::{Capability, OwnerKey};
use formwork_core::{Attributes, Errors, Value};
use parking_lot::Mutex;
use std::sync::Arc;

/// Object that can back a slice of a form's fields
///
/// Every method corresponds to one [`Capability`]. Implementations that
/// cannot honor one of them must leave it out of
/// [`capabilities`](Self::capabilities); such owners are rejected when a
/// form is constructed.
pub trait Owner: Send {
    /// Bulk attribute read
    fn attributes(&self) -> Attributes;

    /// Bulk attribute write
    ///
    /// Failures are owner-internal; the form propagates them unchanged.
    fn assign_attributes(&mut self, attributes: Attributes) -> Result<()>;

    /// Single attribute read used by the form's field getter
    fn read_attribute(&self, name: &str) -> Option<Value> {
        self.attributes().get(name).cloned()
    }

    /// Single attribute write used by the form's field setter
    fn write_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        let mut attributes = Attributes::new();
        attributes.insert(name.to_string(), value);
        self.assign_attributes(attributes)
    }

    /// Run the owner's own validation, replacing its error collection
    fn validate(&mut self) -> bool;

    /// Errors from the most recent [`validate`](Self::validate)
    fn errors(&self) -> &Errors;

    /// Persist the owner, reporting success
    fn persist(&mut self) -> Result<bool>;

    /// Capabilities this owner actually supports
    fn capabilities(&self) -> &'static [Capability] {
        &Capability::ALL
    }

    /// Type name used in diagnostics
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Owner reference as held by a form
pub type SharedOwner = Arc<Mutex<dyn Owner>>;

/// Wrap an owner for binding, keeping the concrete type for the caller
///
/// The returned `Arc<Mutex<O>>` coerces to [`SharedOwner`] when passed to
/// `Form::bind`.
pub fn shared<O: Owner + 'static>(owner: O) -> Arc<Mutex<O>> {
    Arc::new(Mutex::new(owner))
}

/// First capability `owner` is missing, in [`Capability::ALL`] order
pub fn missing_capability(owner: &dyn Owner) -> Option<Capability> {
    let supported = owner.capabilities();
    Capability::ALL
        .into_iter()
        .find(|capability| !supported.contains(capability))
}

/// Reject an owner bound to `slot` that does not honor the full contract
///
/// # Errors
///
/// Returns `FormError::InvalidOwner` naming the slot and the first missing
/// capability.
pub fn ensure_capable(slot: &OwnerKey, owner: &dyn Owner) -> Result<()> {
    match missing_capability(owner) {
        None => Ok(()),
        Some(capability) => Err(FormError::InvalidOwner {
            slot: slot.clone(),
            type_name: owner.type_name().to_string(),
            capability,
        }),
    }
}
