//! Testing utilities: an attribute-bag owner
//!
//! `Record` is a minimal persisted model usable as a form owner in tests and
//! examples. It validates required and numeric fields, counts how often it is
//! validated and persisted, and writes itself into a [`MemoryStore`] so that
//! rollback can be observed.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let product = shared(Record::new().requires("name").numeric("price").stored_in(&store));
//! ```

use crate::owner::Owner;
use formwork_concurrency::MemoryStore;
use formwork_core::error::{FormError, Result};
use formwork_core::types::Capability;
use formwork_core::{Attributes, Errors, Value};
use std::sync::Arc;

const READ_ONLY: [Capability; 3] = [
    Capability::ReadAttributes,
    Capability::WriteAttributes,
    Capability::Validate,
];

/// Attribute-bag owner with simple presence and numericality rules
#[derive(Debug, Clone)]
pub struct Record {
    attributes: Attributes,
    errors: Errors,
    required: Vec<String>,
    numeric: Vec<String>,
    rejected: Vec<String>,
    store: Option<Arc<MemoryStore>>,
    id: Option<String>,
    persist_succeeds: bool,
    capabilities: &'static [Capability],
    validation_count: usize,
    persist_count: usize,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    /// Empty record with no rules and no backing store
    pub fn new() -> Self {
        Self {
            attributes: Attributes::new(),
            errors: Errors::new(),
            required: Vec::new(),
            numeric: Vec::new(),
            rejected: Vec::new(),
            store: None,
            id: None,
            persist_succeeds: true,
            capabilities: &Capability::ALL,
            validation_count: 0,
            persist_count: 0,
        }
    }

    /// Record that cannot persist (fails the owner contract)
    pub fn read_only() -> Self {
        Self {
            capabilities: &READ_ONLY,
            ..Self::new()
        }
    }

    /// Require `field` to be present
    pub fn requires(mut self, field: &str) -> Self {
        self.required.push(field.to_string());
        self
    }

    /// Require `field` to be numeric
    pub fn numeric(mut self, field: &str) -> Self {
        self.numeric.push(field.to_string());
        self
    }

    /// Fail any bulk write that touches `field`
    pub fn rejecting(mut self, field: &str) -> Self {
        self.rejected.push(field.to_string());
        self
    }

    /// Persist into `store`
    pub fn stored_in(mut self, store: &Arc<MemoryStore>) -> Self {
        self.store = Some(Arc::clone(store));
        self
    }

    /// Make every persist report failure
    pub fn failing_persist(mut self) -> Self {
        self.persist_succeeds = false;
        self
    }

    /// Preset an attribute
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.to_string(), value.into());
        self
    }

    /// Current value of `field` (`Null` if unset)
    pub fn get(&self, field: &str) -> Value {
        self.attributes.get(field).cloned().unwrap_or_default()
    }

    /// Set `field` directly, bypassing the owner contract
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.attributes.insert(field.to_string(), value.into());
    }

    /// Store id assigned on first successful persist
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Number of `validate` calls so far
    pub fn validation_count(&self) -> usize {
        self.validation_count
    }

    /// Number of `persist` calls so far
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl Owner for Record {
    fn attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    fn assign_attributes(&mut self, attributes: Attributes) -> Result<()> {
        if let Some(field) = attributes.keys().find(|k| self.rejected.contains(k)) {
            return Err(FormError::owner(
                self.type_name(),
                format!("attribute '{}' is read-only", field),
            ));
        }
        self.attributes.extend(attributes);
        Ok(())
    }

    fn validate(&mut self) -> bool {
        self.validation_count += 1;
        self.errors.clear();
        for field in &self.required {
            if self.attributes.get(field).map_or(true, Value::is_blank) {
                self.errors.add(field.as_str(), "can't be blank");
            }
        }
        for field in &self.numeric {
            if self
                .attributes
                .get(field)
                .and_then(Value::as_number)
                .is_none()
            {
                self.errors.add(field.as_str(), "is not a number");
            }
        }
        self.errors.is_empty()
    }

    fn errors(&self) -> &Errors {
        &self.errors
    }

    fn persist(&mut self) -> Result<bool> {
        self.persist_count += 1;
        if !self.persist_succeeds {
            return Ok(false);
        }
        if let Some(store) = &self.store {
            let id = match &self.id {
                Some(id) => id.clone(),
                None => store.allocate_id(),
            };
            store.put(id.clone(), self.attributes.clone());
            self.id = Some(id);
        }
        Ok(true)
    }

    fn capabilities(&self) -> &'static [Capability] {
        self.capabilities
    }
}
