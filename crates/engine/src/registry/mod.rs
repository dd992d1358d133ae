//! Field and owner registries
//!
//! A [`FormSchema`] is the per-type static table of a form: which fields it
//! exposes, which owner each field is routed to, which owner slots exist, and
//! the validation rules and lifecycle hooks declared alongside them.
//!
//! ## Inheritance
//!
//! Schemas extend each other through an explicit parent link. The merged view
//! is computed once, when the schema is built:
//!
//! - fields: parent entries first, a child entry with the same name replaces
//!   the parent's in place, new child entries are appended
//! - owners: `self` first, then parent slots, then new child slots; a child
//!   redeclaring a slot merges its setup options over the parent's
//! - rules and hooks: parent's first, then the child's, each in declaration
//!   order
//!
//! A built schema is immutable and shared behind an `Arc`.

mod builder;

pub use builder::SchemaBuilder;

use crate::config::FormConfig;
use crate::lifecycle::Hooks;
use crate::validation::Rule;
use formwork_core::types::OwnerKey;
use formwork_core::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Free-form per-owner setup options
pub type SetupOptions = BTreeMap<String, Value>;

/// Setup option naming the localization source of an owner's fields
pub const I18N_OPTION: &str = "i18n";

// ============================================================================
// FieldSpec / FieldOptions
// ============================================================================

/// Declaration options for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    owner: OwnerKey,
    write: bool,
    localization_source: Option<String>,
}

impl FieldOptions {
    /// Route the field to `owner`
    pub fn owner(owner: impl Into<OwnerKey>) -> Self {
        Self {
            owner: owner.into(),
            write: false,
            localization_source: None,
        }
    }

    /// Let the field survive allow-list filtering of untrusted input
    pub fn writable(mut self) -> Self {
        self.write = true;
        self
    }

    /// Name the type whose translations label this field
    pub fn localized_by(mut self, source: impl Into<String>) -> Self {
        self.localization_source = Some(source.into());
        self
    }
}

/// One field exposed on a form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    owner: OwnerKey,
    writable: bool,
    localization_source: Option<String>,
}

impl FieldSpec {
    pub(crate) fn new(name: String, options: FieldOptions) -> Self {
        Self {
            name,
            owner: options.owner,
            writable: options.write,
            localization_source: options.localization_source,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner slot the field is routed to
    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// True if the field survives allow-list filtering
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Localization hint, if declared
    pub fn localization_source(&self) -> Option<&str> {
        self.localization_source.as_deref()
    }
}

// ============================================================================
// OwnerSlot
// ============================================================================

/// One declared owner slot
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSlot {
    key: OwnerKey,
    setup_options: SetupOptions,
}

impl OwnerSlot {
    pub(crate) fn new(key: OwnerKey, setup_options: SetupOptions) -> Self {
        Self { key, setup_options }
    }

    /// Slot key
    pub fn key(&self) -> &OwnerKey {
        &self.key
    }

    /// True for the implicit self slot
    pub fn is_self(&self) -> bool {
        self.key.is_self()
    }

    /// All setup options
    pub fn setup_options(&self) -> &SetupOptions {
        &self.setup_options
    }

    /// One setup option
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.setup_options.get(name)
    }

    pub(crate) fn merge_options(&mut self, options: SetupOptions) {
        self.setup_options.extend(options);
    }
}

// ============================================================================
// FormSchema
// ============================================================================

/// Immutable per-type registry of a form
pub struct FormSchema {
    name: String,
    parent: Option<Arc<FormSchema>>,
    fields: Vec<FieldSpec>,
    owners: Vec<OwnerSlot>,
    rules: Vec<Rule>,
    hooks: Hooks,
    config: FormConfig,
}

impl FormSchema {
    /// Start declaring a schema named `name`
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Schema name (used in diagnostics and as default localization source)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema this one extends
    pub fn parent(&self) -> Option<&Arc<FormSchema>> {
        self.parent.as_ref()
    }

    /// Merged field registry, one entry per name
    pub fn resolve_fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Merged owner registry, `self` first, one entry per key
    pub fn resolve_owners(&self) -> &[OwnerSlot] {
        &self.owners
    }

    /// Owner slots other than `self`, in registry order
    pub fn foreign_owners(&self) -> impl Iterator<Item = &OwnerSlot> {
        self.owners.iter().filter(|slot| !slot.is_self())
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True if `name` is a declared field
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Look up an owner slot by key
    pub fn owner(&self, key: &str) -> Option<&OwnerSlot> {
        self.owners.iter().find(|slot| slot.key == *key)
    }

    /// Names of every field routed to `owner`
    pub fn fields_for_owner(&self, owner: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.owner == *owner)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Names of the writable fields routed to `owner`
    pub fn writable_fields_for_owner(&self, owner: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.owner == *owner && f.writable)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Where translations for `field` come from
    ///
    /// The field's own hint wins, then its owner slot's `i18n` setup option,
    /// then the schema name. `None` if the field is not declared.
    pub fn localization_source(&self, field: &str) -> Option<&str> {
        let spec = self.field(field)?;
        if let Some(source) = spec.localization_source() {
            return Some(source);
        }
        let from_owner = self
            .owner(spec.owner.as_str())
            .and_then(|slot| slot.option(I18N_OPTION))
            .and_then(Value::as_str);
        Some(from_owner.unwrap_or(&self.name))
    }

    /// Validation rules, parent's first
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Lifecycle hooks, parent's first
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Effective configuration
    pub fn config(&self) -> &FormConfig {
        &self.config
    }
}

impl fmt::Debug for FormSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSchema")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("fields", &self.fields)
            .field("owners", &self.owners)
            .field("rules", &self.rules.len())
            .field("config", &self.config)
            .finish()
    }
}
