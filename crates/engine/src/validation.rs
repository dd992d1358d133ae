//! Validation aggregation
//!
//! A validation pass over a form runs, in order:
//!
//! 1. Owner aggregation: every bound non-self owner validates itself; its
//!    field-level errors are copied onto the form, but only for field names
//!    the form exposes. Errors on unexposed owner fields are dropped.
//! 2. The schema's declared rules, parent's first, in declaration order.
//!    This includes `require_owner_valid` rules, which report an owner's
//!    whole error set under the owner's own key.
//!
//! Messages accumulate; nothing is deduplicated. The form is valid iff its
//! error collection is empty afterwards.

use crate::config::OwnerErrorMode;
use crate::form::Form;
use crate::registry::FormSchema;
use formwork_core::types::OwnerKey;
use formwork_core::{Errors, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Message for a blank required field
pub const BLANK: &str = "can't be blank";

/// Message for a non-numeric field
pub const NOT_A_NUMBER: &str = "is not a number";

/// Custom validation check
pub type Check = dyn Fn(&Form, &mut Errors) + Send + Sync;

/// Gate for a conditional owner rule
pub type Condition = dyn Fn(&Form) -> bool + Send + Sync;

/// A declared validation rule
#[derive(Clone)]
pub enum Rule {
    /// Arbitrary check adding messages to the collection
    Custom(Arc<Check>),
    /// Report an owner's overall validity under its own key
    OwnerValid {
        /// Owner slot checked
        owner: OwnerKey,
        /// Rule applies only when this holds
        condition: Option<Arc<Condition>>,
    },
}

impl Rule {
    /// Wrap a closure as a rule
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&Form, &mut Errors) + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(check))
    }

    /// `field` must be present (unbound owner fields count as blank)
    pub fn presence(field: impl Into<String>) -> Self {
        let field = field.into();
        Rule::custom(move |form, errors| {
            let blank = form.get(&field).map_or(true, |value| value.is_blank());
            if blank {
                errors.add(field.as_str(), BLANK);
            }
        })
    }

    /// `field` must be an integer, a finite float or a numeric string
    pub fn numericality(field: impl Into<String>) -> Self {
        let field = field.into();
        Rule::custom(move |form, errors| {
            let numeric = form
                .get(&field)
                .ok()
                .as_ref()
                .and_then(Value::as_number)
                .is_some();
            if !numeric {
                errors.add(field.as_str(), NOT_A_NUMBER);
            }
        })
    }

    /// Owner validity rule, optionally gated
    pub fn owner_valid(owner: OwnerKey, condition: Option<Arc<Condition>>) -> Self {
        Rule::OwnerValid { owner, condition }
    }

    /// Owner targeted by an owner validity rule
    pub fn owner(&self) -> Option<&OwnerKey> {
        match self {
            Rule::Custom(_) => None,
            Rule::OwnerValid { owner, .. } => Some(owner),
        }
    }

    /// True if the rule's condition holds (always true for ungated rules)
    pub fn is_open(&self, form: &Form) -> bool {
        match self {
            Rule::OwnerValid {
                condition: Some(cond),
                ..
            } => cond(form),
            _ => true,
        }
    }

    /// Apply the rule, appending any messages to `errors`
    ///
    /// Evaluates the rule's condition first. A validation pass evaluates each
    /// condition once and calls [`apply_open`](Self::apply_open) instead.
    pub fn apply(&self, form: &Form, errors: &mut Errors) {
        if self.is_open(form) {
            self.apply_open(form, errors);
        } else if let Some(owner) = self.owner() {
            trace!(%owner, "owner rule condition false");
        }
    }

    /// Apply the rule as if its condition holds
    pub(crate) fn apply_open(&self, form: &Form, errors: &mut Errors) {
        match self {
            Rule::Custom(check) => check(form, errors),
            Rule::OwnerValid { owner, .. } => {
                let Some(handle) = form.owner(owner.as_str()) else {
                    trace!(%owner, "owner rule skipped, owner unbound");
                    return;
                };
                let guard = handle.lock();
                let owner_errors = guard.errors();
                if !owner_errors.is_empty() {
                    errors.add(
                        owner.as_str(),
                        format!("is invalid due to {}", owner_errors),
                    );
                }
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Custom(_) => f.write_str("Custom"),
            Rule::OwnerValid { owner, condition } => f
                .debug_struct("OwnerValid")
                .field("owner", owner)
                .field("conditional", &condition.is_some())
                .finish(),
        }
    }
}

/// Validate every bound non-self owner and fold its field errors into `errors`
///
/// `open` holds each rule's condition outcome for this pass, in rule order.
/// Returns the number of owners that reported themselves invalid.
pub(crate) fn aggregate_owners(
    form: &Form,
    schema: &FormSchema,
    open: &[bool],
    errors: &mut Errors,
) -> usize {
    let config = schema.config();
    let mut invalid = 0;

    for slot in schema.foreign_owners() {
        let key = slot.key();
        let Some(handle) = form.owner(key.as_str()) else {
            trace!(owner = %key, "validation skipped, owner unbound");
            continue;
        };

        let suppress_fields = config.owner_errors == OwnerErrorMode::OwnerOnly
            && schema
                .rules()
                .iter()
                .zip(open)
                .any(|(rule, open)| *open && rule.owner() == Some(key));

        let mut owner = handle.lock();
        if owner.validate() {
            continue;
        }
        invalid += 1;
        debug!(form = schema.name(), owner = %key, errors = %owner.errors(), "owner invalid");

        if !suppress_fields {
            for (field, messages) in owner.errors().iter() {
                if !schema.has_field(field) {
                    trace!(owner = %key, field, "dropping error on unexposed field");
                    continue;
                }
                for message in messages {
                    errors.add(field, message.clone());
                }
            }
        }
        if config.invalid_owner_on_base {
            let type_name = owner.type_name();
            let short = type_name.rsplit("::").next().unwrap_or(type_name);
            errors.add_to_base(format!("{} of type {} is invalid", key, short));
        }
    }
    invalid
}

/// Full validation pass: owners first, then declared rules
///
/// Rule conditions are evaluated exactly once, before any owner is locked,
/// since they may read the form.
pub(crate) fn run_validations(form: &Form, schema: &FormSchema, errors: &mut Errors) {
    let open: Vec<bool> = schema.rules().iter().map(|rule| rule.is_open(form)).collect();
    let invalid_owners = aggregate_owners(form, schema, &open, errors);
    for (rule, open) in schema.rules().iter().zip(&open) {
        if *open {
            rule.apply_open(form, errors);
        } else if let Some(owner) = rule.owner() {
            trace!(%owner, "owner rule condition false");
        }
    }
    debug!(
        form = schema.name(),
        invalid_owners,
        error_count = errors.len(),
        "validation pass finished"
    );
}
