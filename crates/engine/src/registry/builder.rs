//! Declarative builder for form schemas
//!
//! Declarations are recorded in order and checked when `build()` runs.
//! Malformed declarations are programmer errors: they surface as
//! `FormError::Declaration` from `build()`, never at instance time.
//!
//! # Example
//!
//! ```ignore
//! static ORDER_FORM: Lazy<Arc<FormSchema>> = Lazy::new(|| {
//!     FormSchema::builder("OrderForm")
//!         .owner("billing")
//!         .field("amount", FieldOptions::owner("billing").writable())
//!         .field("note", FieldOptions::owner("self"))
//!         .validates_presence_of("note")
//!         .build()
//!         .expect("OrderForm declaration")
//! });
//! ```

use super::{FieldOptions, FieldSpec, FormSchema, OwnerSlot, SetupOptions};
use crate::config::FormConfig;
use crate::form::Form;
use crate::lifecycle::{Hooks, Proceed};
use crate::validation::Rule;
use formwork_core::error::{FormError, Result};
use formwork_core::types::{OwnerKey, Phase};
use formwork_core::Errors;
use std::sync::Arc;

/// Builder for [`FormSchema`]
pub struct SchemaBuilder {
    name: String,
    parent: Option<Arc<FormSchema>>,
    fields: Vec<FieldSpec>,
    owners: Vec<OwnerSlot>,
    rules: Vec<Rule>,
    hooks: Hooks,
    config: Option<FormConfig>,
    rule_fields: Vec<(&'static str, String)>,
    problems: Vec<String>,
}

impl SchemaBuilder {
    /// Create a builder for a schema named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            owners: Vec::new(),
            rules: Vec::new(),
            hooks: Hooks::default(),
            config: None,
            rule_fields: Vec::new(),
            problems: Vec::new(),
        }
    }

    /// Inherit fields, owners, rules, hooks and config from `parent`
    pub fn extends(mut self, parent: &Arc<FormSchema>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declare an owner slot with no setup options
    pub fn owner(self, key: impl Into<OwnerKey>) -> Self {
        self.owner_with(key, SetupOptions::new())
    }

    /// Declare an owner slot, or merge options into an existing declaration
    pub fn owner_with(mut self, key: impl Into<OwnerKey>, options: SetupOptions) -> Self {
        self.declare_owner(key.into(), options);
        self
    }

    /// Declare a field; its owner slot is registered if new
    pub fn field(mut self, name: impl Into<String>, options: FieldOptions) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            self.problems.push("field name must not be empty".to_string());
            return self;
        }
        self.declare_owner(options.owner.clone(), SetupOptions::new());

        let spec = FieldSpec::new(name, options);
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    /// Add a validation rule
    pub fn validate<F>(mut self, check: F) -> Self
    where
        F: Fn(&Form, &mut Errors) + Send + Sync + 'static,
    {
        self.rules.push(Rule::custom(check));
        self
    }

    /// Require `field` to be present
    pub fn validates_presence_of(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.rule_fields.push(("validates_presence_of", field.clone()));
        self.rules.push(Rule::presence(field));
        self
    }

    /// Require `field` to be numeric
    pub fn validates_numericality_of(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.rule_fields.push(("validates_numericality_of", field.clone()));
        self.rules.push(Rule::numericality(field));
        self
    }

    /// Report `owner`'s overall validity under its own key
    pub fn require_owner_valid(self, owner: impl Into<OwnerKey>) -> Self {
        self.push_owner_rule(owner.into(), None)
    }

    /// Report `owner`'s overall validity under its own key when `condition`
    /// holds for the form
    pub fn require_owner_valid_if<C>(self, owner: impl Into<OwnerKey>, condition: C) -> Self
    where
        C: Fn(&Form) -> bool + Send + Sync + 'static,
    {
        self.push_owner_rule(owner.into(), Some(Arc::new(condition)))
    }

    /// Register a hook that runs before the phase body
    pub fn before<F>(mut self, phase: Phase, hook: F) -> Self
    where
        F: Fn(&mut Form) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.for_phase_mut(phase).before.push(Arc::new(hook));
        self
    }

    /// Register a hook that runs after the phase body
    pub fn after<F>(mut self, phase: Phase, hook: F) -> Self
    where
        F: Fn(&mut Form) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.for_phase_mut(phase).after.push(Arc::new(hook));
        self
    }

    /// Register a hook that wraps the phase body
    ///
    /// The hook must call [`Proceed::run`] to execute the body and any inner
    /// around hooks. Returning without calling it skips the body.
    pub fn around<F>(mut self, phase: Phase, hook: F) -> Self
    where
        F: for<'p> Fn(&mut Form, Proceed<'p>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.for_phase_mut(phase).around.push(Arc::new(hook));
        self
    }

    /// Use `config` instead of the parent's (or the default)
    pub fn config(mut self, config: &FormConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Check declarations and compute the merged registries
    ///
    /// # Errors
    ///
    /// Returns `FormError::Declaration` listing every malformed declaration.
    pub fn build(mut self) -> Result<Arc<FormSchema>> {
        let (mut fields, mut owners, mut rules, mut hooks, inherited_config) = match &self.parent {
            Some(parent) => (
                parent.fields.clone(),
                parent.owners.clone(),
                parent.rules.clone(),
                parent.hooks.clone(),
                Some(parent.config.clone()),
            ),
            None => (
                Vec::new(),
                vec![OwnerSlot::new(OwnerKey::self_slot(), SetupOptions::new())],
                Vec::new(),
                Hooks::default(),
                None,
            ),
        };

        for slot in self.owners.drain(..) {
            match owners.iter_mut().find(|s| s.key == slot.key) {
                Some(existing) => existing.merge_options(slot.setup_options),
                None => owners.push(slot),
            }
        }
        for spec in self.fields.drain(..) {
            match fields.iter_mut().find(|f| f.name == spec.name) {
                Some(existing) => *existing = spec,
                None => fields.push(spec),
            }
        }
        rules.append(&mut self.rules);
        hooks.extend(&self.hooks);

        for spec in &fields {
            if !owners.iter().any(|slot| slot.key == spec.owner) {
                self.problems.push(format!(
                    "field '{}' routed to undeclared owner '{}'",
                    spec.name, spec.owner
                ));
            }
        }
        for (declaration, field) in &self.rule_fields {
            if !fields.iter().any(|spec| spec.name == *field) {
                self.problems.push(format!(
                    "{} names undeclared field '{}'",
                    declaration, field
                ));
            }
        }
        for rule in &rules {
            if let Some(owner) = rule.owner() {
                if !owners.iter().any(|slot| slot.key == *owner) {
                    self.problems.push(format!(
                        "require_owner_valid names undeclared owner '{}'",
                        owner
                    ));
                }
            }
        }

        if !self.problems.is_empty() {
            return Err(FormError::declaration(format!(
                "{}: {}",
                self.name,
                self.problems.join("; ")
            )));
        }

        let config = self.config.or(inherited_config).unwrap_or_default();

        Ok(Arc::new(FormSchema {
            name: self.name,
            parent: self.parent,
            fields,
            owners,
            rules,
            hooks,
            config,
        }))
    }

    fn declare_owner(&mut self, key: OwnerKey, options: SetupOptions) {
        if key.as_str().trim().is_empty() {
            self.problems.push("owner key must not be empty".to_string());
            return;
        }
        if key.is_self() {
            if !options.is_empty() {
                self.problems
                    .push("the self slot is implicit and takes no setup options".to_string());
            }
            return;
        }
        match self.owners.iter_mut().find(|slot| slot.key == key) {
            Some(existing) => existing.merge_options(options),
            None => self.owners.push(OwnerSlot::new(key, options)),
        }
    }

    fn push_owner_rule(
        mut self,
        owner: OwnerKey,
        condition: Option<Arc<crate::validation::Condition>>,
    ) -> Self {
        if owner.is_self() {
            self.problems
                .push("require_owner_valid cannot target the self slot".to_string());
            return self;
        }
        self.rules.push(Rule::owner_valid(owner, condition));
        self
    }
}
