//! Persistence orchestration
//!
//! `save` validates (unless told not to), then persists every bound non-self
//! owner inside one transaction on the form's unit of work:
//!
//! - validation runs before the transaction opens; an invalid form returns
//!   `Ok(false)` without touching any owner
//! - the `Save` phase (hooks plus the persist loop) runs inside the
//!   transaction
//! - every owner is persisted even after one reports failure
//! - the transaction commits only if every owner succeeded and the save body
//!   actually ran; otherwise it rolls back
//! - a hook or owner error rolls back and is returned

use crate::form::Form;
use crate::lifecycle::run_phase;
use formwork_concurrency::TransactionScope;
use formwork_core::error::{FormError, Result};
use formwork_core::types::Phase;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Form option consulted when [`SaveOptions::validate`] is unset
pub const VALIDATE_OPTION: &str = "validate";

/// Per-call save options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Whether to validate first; `None` defers to the form's `validate`
    /// option, then to the schema config
    pub validate: Option<bool>,
}

impl SaveOptions {
    /// Defaults: validation decided by the form and its config
    pub fn new() -> Self {
        Self::default()
    }

    /// Save without validating
    pub fn skip_validation() -> Self {
        Self {
            validate: Some(false),
        }
    }

    /// Force validation on or off
    pub fn validate(validate: bool) -> Self {
        Self {
            validate: Some(validate),
        }
    }
}

impl Form {
    /// Validate (per `options`), then persist all bound owners atomically
    ///
    /// Returns `Ok(false)` when the form is invalid or any owner fails to
    /// persist; in the latter case the transaction is rolled back.
    ///
    /// # Errors
    ///
    /// Hook faults, owner-internal persist errors, and unit-of-work failures.
    pub fn save(&mut self, options: SaveOptions) -> Result<bool> {
        if self.should_validate(options) && !self.is_valid()? {
            debug!(form = self.schema.name(), errors = %self.errors, "save rejected, form invalid");
            return Ok(false);
        }

        let unit_of_work = self.save_unit_of_work();
        let saved = TransactionScope::run(&*unit_of_work, |scope| {
            let mut all_persisted = false;
            let report = run_phase(self, Phase::Save, &mut |form| {
                all_persisted = form.persist_owners()?;
                Ok(())
            })?;
            if !report.body_ran {
                warn!(txn_id = scope.txn_id(), "save body skipped by around hook");
            }
            Ok(report.body_ran && all_persisted)
        })?;

        if saved {
            info!(form = self.schema.name(), "form saved");
        } else {
            debug!(form = self.schema.name(), "save rolled back");
        }
        Ok(saved)
    }

    /// [`save`](Self::save), with failure turned into an error
    ///
    /// # Errors
    ///
    /// `FormError::RecordInvalid` carrying the form's errors when `save`
    /// returns `false`, or any error `save` itself returns.
    pub fn save_strict(&mut self, options: SaveOptions) -> Result<()> {
        if self.save(options)? {
            Ok(())
        } else {
            Err(FormError::RecordInvalid(self.errors.clone()))
        }
    }

    /// Persist every bound non-self owner in registry order
    ///
    /// All owners are attempted; the result is true only if all succeeded.
    /// Unbound slots are skipped.
    ///
    /// # Errors
    ///
    /// The first owner-internal persist error, after which no further owner
    /// is attempted.
    pub fn persist_owners(&self) -> Result<bool> {
        let schema = Arc::clone(&self.schema);
        let mut all = true;
        for slot in schema.foreign_owners() {
            let Some(handle) = self.owner(slot.key().as_str()) else {
                debug!(owner = %slot.key(), "persist skipped, owner unbound");
                continue;
            };
            let persisted = handle.lock().persist()?;
            if !persisted {
                debug!(owner = %slot.key(), "owner failed to persist");
            }
            all &= persisted;
        }
        Ok(all)
    }

    fn should_validate(&self, options: SaveOptions) -> bool {
        options
            .validate
            .or_else(|| self.option(VALIDATE_OPTION).and_then(|v| v.as_bool()))
            .unwrap_or(self.schema.config().validate_on_save)
    }
}
