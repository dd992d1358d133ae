//! Form instances
//!
//! A [`Form`] presents one flat attribute surface over the owners bound to
//! its schema's slots. Fields routed to `self` live on the form; every
//! other field is read and written through its owner.
//!
//! Construction runs the `Initialize` phase around three steps:
//!
//! 1. the init callback (typically binds owners)
//! 2. the capability check on every bound owner
//! 3. routing of the initial params
//!
//! A form is not safe for concurrent use; callers sharing one across threads
//! must serialize access themselves.

use crate::lifecycle::{run_phase, PhaseReport};
use crate::owner::{ensure_capable, SharedOwner};
use crate::registry::FormSchema;
use formwork_concurrency::{NoTransaction, UnitOfWork};
use formwork_core::error::{FormError, Result};
use formwork_core::types::{OwnerKey, Phase};
use formwork_core::{Attributes, Errors, Input, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

type InitFn<'i> = Box<dyn FnOnce(&mut Form) -> Result<()> + 'i>;

/// Builder for [`Form`]
pub struct FormBuilder<'i> {
    schema: Arc<FormSchema>,
    params: Input,
    options: Attributes,
    init: Option<InitFn<'i>>,
    unit_of_work: Option<Arc<dyn UnitOfWork>>,
}

impl<'i> FormBuilder<'i> {
    /// Initial attributes, routed after the init callback
    pub fn params(mut self, params: impl Into<Input>) -> Self {
        self.params = params.into();
        self
    }

    /// Free-form options
    pub fn options(mut self, options: Attributes) -> Self {
        self.options = options;
        self
    }

    /// Callback receiving the partially built form before params are routed
    pub fn init<F>(mut self, init: F) -> Self
    where
        F: FnOnce(&mut Form) -> Result<()> + 'i,
    {
        self.init = Some(Box::new(init));
        self
    }

    /// Transactional resource used by `save`
    pub fn unit_of_work(mut self, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        self.unit_of_work = Some(unit_of_work);
        self
    }

    /// Run the `Initialize` phase and return the form
    ///
    /// # Errors
    ///
    /// - `FormError::InvalidOwner` if a bound owner lacks a capability
    /// - any error from the init callback, a hook, or an owner's bulk setter
    pub fn build(self) -> Result<Form> {
        let mut form = Form {
            schema: self.schema,
            params: Input::default(),
            options: self.options,
            values: Attributes::new(),
            owners: BTreeMap::new(),
            errors: Errors::new(),
            unit_of_work: self.unit_of_work,
            non_atomic_warned: false,
            phase_reports: HashMap::new(),
        };

        let mut init = self.init;
        let mut params = Some(self.params);
        run_phase(&mut form, Phase::Initialize, &mut |form| {
            if let Some(init) = init.take() {
                init(form)?;
            }
            form.check_owners()?;
            if let Some(params) = params.take() {
                form.set_attributes(params)?;
            }
            Ok(())
        })?;

        debug!(
            form = form.schema.name(),
            bound = form.owners.len(),
            "form initialized"
        );
        Ok(form)
    }
}

/// A form instance
pub struct Form {
    pub(crate) schema: Arc<FormSchema>,
    pub(crate) params: Input,
    options: Attributes,
    pub(crate) values: Attributes,
    owners: BTreeMap<OwnerKey, SharedOwner>,
    pub(crate) errors: Errors,
    unit_of_work: Option<Arc<dyn UnitOfWork>>,
    non_atomic_warned: bool,
    phase_reports: HashMap<Phase, PhaseReport>,
}

impl Form {
    /// Start building a form of `schema`
    ///
    /// Saves are only atomic across owners when a unit of work is injected
    /// with [`FormBuilder::unit_of_work`] or [`Form::use_transaction`].
    /// Without one, `save` runs under [`NoTransaction`] and an owner persisted
    /// before a later failure stays persisted.
    pub fn builder<'i>(schema: &Arc<FormSchema>) -> FormBuilder<'i> {
        FormBuilder {
            schema: Arc::clone(schema),
            params: Input::default(),
            options: Attributes::new(),
            init: None,
            unit_of_work: None,
        }
    }

    /// Build a form with `params` and nothing else
    ///
    /// # Errors
    ///
    /// See [`FormBuilder::build`].
    pub fn new(schema: &Arc<FormSchema>, params: impl Into<Input>) -> Result<Form> {
        Form::builder(schema).params(params).build()
    }

    /// Schema this form was built from
    pub fn schema(&self) -> &Arc<FormSchema> {
        &self.schema
    }

    // ========================================================================
    // Owner bindings
    // ========================================================================

    /// Bind `owner` to the slot `key`, replacing any previous binding
    ///
    /// # Errors
    ///
    /// `FormError::UnknownOwner` if the schema has no such slot or `key` is
    /// the implicit self slot.
    pub fn bind(&mut self, key: impl Into<OwnerKey>, owner: SharedOwner) -> Result<()> {
        let key = key.into();
        if key.is_self() || self.schema.owner(key.as_str()).is_none() {
            return Err(FormError::UnknownOwner(key));
        }
        self.owners.insert(key, owner);
        Ok(())
    }

    /// Remove the binding for `key`, returning it
    pub fn unbind(&mut self, key: &str) -> Option<SharedOwner> {
        self.owners.remove(key)
    }

    /// Owner bound to `key`
    pub fn owner(&self, key: &str) -> Option<&SharedOwner> {
        self.owners.get(key)
    }

    /// Bound owners in registry order
    ///
    /// With `except_self == false` the self slot is listed first with `None`,
    /// since the form itself is not a shareable owner handle.
    pub fn bound_owners(&self, except_self: bool) -> Vec<(&OwnerKey, Option<&SharedOwner>)> {
        self.schema
            .resolve_owners()
            .iter()
            .filter_map(|slot| {
                if slot.is_self() {
                    (!except_self).then_some((slot.key(), None))
                } else {
                    self.owners.get(slot.key()).map(|owner| (slot.key(), Some(owner)))
                }
            })
            .collect()
    }

    /// Reject bound owners that do not honor the full owner contract
    ///
    /// # Errors
    ///
    /// `FormError::InvalidOwner` naming the first offending slot.
    pub fn check_owners(&self) -> Result<()> {
        for (key, owner) in &self.owners {
            ensure_capable(key, &*owner.lock())?;
        }
        Ok(())
    }

    // ========================================================================
    // Field access
    // ========================================================================

    /// Read one field through its owner
    ///
    /// Unset self fields read as `Value::Null`.
    ///
    /// # Errors
    ///
    /// - `FormError::UnknownField` if the field is not declared
    /// - `FormError::UnboundOwner` if its owner slot is empty
    pub fn get(&self, field: &str) -> Result<Value> {
        let spec = self
            .schema
            .field(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        if spec.owner().is_self() {
            return Ok(self.values.get(field).cloned().unwrap_or_default());
        }
        let owner = self.bound(spec.owner(), field)?;
        let value = owner.lock().read_attribute(field);
        Ok(value.unwrap_or_default())
    }

    /// Write one field through its owner, never filtered
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get), plus any owner-internal write failure.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let spec = self
            .schema
            .field(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        let value = value.into();
        if spec.owner().is_self() {
            self.values.insert(field.to_string(), value);
            return Ok(());
        }
        let owner = self.bound(spec.owner(), field)?;
        owner.lock().write_attribute(field, value)
    }

    fn bound(&self, slot: &OwnerKey, field: &str) -> Result<&SharedOwner> {
        self.owners.get(slot).ok_or_else(|| FormError::UnboundOwner {
            slot: slot.clone(),
            field: field.to_string(),
        })
    }

    /// Raw params as last set
    pub fn attributes(&self) -> &Attributes {
        self.params.as_map()
    }

    /// Raw params with their trust level
    pub fn params(&self) -> &Input {
        &self.params
    }

    // ========================================================================
    // Options
    // ========================================================================

    /// Free-form options
    pub fn options(&self) -> &Attributes {
        &self.options
    }

    /// One option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Set one option
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Errors from the most recent validation pass
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Mutable access for hooks that add their own messages
    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    /// Run a fresh validation pass
    ///
    /// Clears prior errors, then runs the `Validation` phase once. Every
    /// rule and every bound owner's `validate` executes at most once.
    ///
    /// # Errors
    ///
    /// Only hook faults; invalid data is reported through
    /// [`errors`](Self::errors) and `Ok(false)`.
    pub fn is_valid(&mut self) -> Result<bool> {
        self.errors.clear();
        run_phase(self, Phase::Validation, &mut |form| {
            let schema = Arc::clone(&form.schema);
            let mut errors = std::mem::take(&mut form.errors);
            crate::validation::run_validations(form, &schema, &mut errors);
            form.errors = errors;
            Ok(())
        })?;
        let valid = self.errors.is_empty();
        debug!(form = self.schema.name(), valid, errors = %self.errors, "validated");
        Ok(valid)
    }

    // ========================================================================
    // Persistence plumbing
    // ========================================================================

    /// Use `unit_of_work` for subsequent saves
    pub fn use_transaction(&mut self, unit_of_work: Arc<dyn UnitOfWork>) {
        self.unit_of_work = Some(unit_of_work);
    }

    /// True if saves run inside an injected unit of work
    pub fn has_unit_of_work(&self) -> bool {
        self.unit_of_work.is_some()
    }

    /// Unit of work for the next save
    ///
    /// Falls back to [`NoTransaction`], warning once per form.
    pub(crate) fn save_unit_of_work(&mut self) -> Arc<dyn UnitOfWork> {
        if let Some(unit_of_work) = &self.unit_of_work {
            return Arc::clone(unit_of_work);
        }
        if !self.non_atomic_warned {
            self.non_atomic_warned = true;
            warn!(
                form = self.schema.name(),
                "saving without a unit of work, owner writes are not atomic"
            );
        }
        Arc::new(NoTransaction)
    }

    /// Always false: a form is never itself a stored record
    pub fn is_persisted(&self) -> bool {
        false
    }

    /// Report from the last run of `phase`
    pub fn phase_report(&self, phase: Phase) -> Option<PhaseReport> {
        self.phase_reports.get(&phase).copied()
    }

    pub(crate) fn record_phase(&mut self, report: PhaseReport) {
        self.phase_reports.insert(report.phase, report);
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("schema", &self.schema.name())
            .field("params", &self.params)
            .field("options", &self.options)
            .field("values", &self.values)
            .field("owners", &self.owners.keys().collect::<Vec<_>>())
            .field("errors", &self.errors)
            .finish()
    }
}
