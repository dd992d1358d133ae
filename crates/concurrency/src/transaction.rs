//! Transaction scope around owner persistence
//!
//! A `TransactionScope` brackets one unit of work: it is opened with
//! `begin`, and leaves the `Active` state exactly once, by commit or by
//! rollback. A scope that is dropped while still active rolls back, so the
//! resource is released on every exit path including early returns and
//! unwinding.
//!
//! State transitions:
//! - `Active` → `Committed` (commit succeeded)
//! - `Active` → `Aborted` (explicit rollback, failed commit, or drop)
//!
//! Terminal states (no transitions allowed):
//! - `Committed`
//! - `Aborted`

use crate::unit_of_work::UnitOfWork;
use formwork_core::error::{FormError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Process-wide transaction id counter (diagnostics only)
static NEXT_TXN_ID: AtomicU64 = AtomicU64::new(1);

/// Status of a transaction scope in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Writes are being grouped
    Active,
    /// Writes were made durable
    Committed,
    /// Writes were discarded
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// One open transaction on a [`UnitOfWork`]
pub struct TransactionScope<'a> {
    txn_id: u64,
    resource: &'a dyn UnitOfWork,
    status: TransactionStatus,
}

impl<'a> TransactionScope<'a> {
    /// Open a transaction on `resource`
    ///
    /// # Errors
    ///
    /// Propagates the resource's `begin` failure; no scope is created.
    pub fn begin(resource: &'a dyn UnitOfWork) -> Result<Self> {
        resource.begin()?;
        let txn_id = NEXT_TXN_ID.fetch_add(1, Ordering::Relaxed);
        debug!(txn_id, "transaction opened");
        Ok(Self {
            txn_id,
            resource,
            status: TransactionStatus::Active,
        })
    }

    /// Execute `f` inside a transaction
    ///
    /// - `Ok(true)` commits and returns `Ok(true)`
    /// - `Ok(false)` rolls back and returns `Ok(false)`
    /// - `Err(e)` rolls back and returns `Err(e)`
    ///
    /// If `f` already finished the scope itself, its outcome is respected.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a begin/commit/rollback failure.
    pub fn run<F>(resource: &'a dyn UnitOfWork, f: F) -> Result<bool>
    where
        F: FnOnce(&mut TransactionScope<'a>) -> Result<bool>,
    {
        let mut scope = Self::begin(resource)?;

        match f(&mut scope) {
            Ok(true) if scope.is_active() => {
                scope.commit()?;
                Ok(true)
            }
            Ok(true) => Ok(scope.is_committed()),
            Ok(false) => {
                if scope.is_active() {
                    scope.rollback("unit of work reported failure")?;
                }
                Ok(false)
            }
            Err(e) => {
                if scope.is_active() {
                    if let Err(rollback_err) = scope.rollback(format!("closure error: {}", e)) {
                        warn!(txn_id = scope.txn_id, error = %rollback_err, "rollback after error failed");
                    }
                }
                Err(e)
            }
        }
    }

    /// Diagnostic id of this transaction
    pub fn txn_id(&self) -> u64 {
        self.txn_id
    }

    /// Current status
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Check if the scope is still open
    pub fn is_active(&self) -> bool {
        matches!(self.status, TransactionStatus::Active)
    }

    /// Check if the scope committed
    pub fn is_committed(&self) -> bool {
        matches!(self.status, TransactionStatus::Committed)
    }

    /// Check if the scope rolled back
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Ensure the scope is still open
    ///
    /// # Errors
    ///
    /// Returns `FormError::Transaction` if already committed or aborted.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(FormError::Transaction(format!(
                "Transaction {} is not active: {:?}",
                self.txn_id, self.status
            )))
        }
    }

    /// Commit the transaction
    ///
    /// A failed commit leaves the scope `Aborted` and asks the resource to
    /// roll back what it can.
    ///
    /// # State Transition
    /// `Active` → `Committed` (or `Aborted` on failure)
    pub fn commit(&mut self) -> Result<()> {
        self.ensure_active()?;
        match self.resource.commit() {
            Ok(()) => {
                self.status = TransactionStatus::Committed;
                debug!(txn_id = self.txn_id, "transaction committed");
                Ok(())
            }
            Err(e) => {
                self.status = TransactionStatus::Aborted {
                    reason: format!("commit failed: {}", e),
                };
                if let Err(rollback_err) = self.resource.rollback() {
                    warn!(txn_id = self.txn_id, error = %rollback_err, "rollback after failed commit failed");
                }
                Err(e)
            }
        }
    }

    /// Roll the transaction back
    ///
    /// # State Transition
    /// `Active` → `Aborted`
    pub fn rollback(&mut self, reason: impl Into<String>) -> Result<()> {
        match &self.status {
            TransactionStatus::Committed => Err(FormError::Transaction(format!(
                "Cannot abort committed transaction {}",
                self.txn_id
            ))),
            TransactionStatus::Aborted { .. } => Err(FormError::Transaction(format!(
                "Transaction {} already aborted",
                self.txn_id
            ))),
            TransactionStatus::Active => {
                let reason = reason.into();
                debug!(txn_id = self.txn_id, %reason, "transaction rolled back");
                self.status = TransactionStatus::Aborted { reason };
                self.resource.rollback()
            }
        }
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if self.is_active() {
            warn!(txn_id = self.txn_id, "transaction scope dropped while active, rolling back");
            self.status = TransactionStatus::Aborted {
                reason: "scope dropped while active".to_string(),
            };
            if let Err(e) = self.resource.rollback() {
                warn!(txn_id = self.txn_id, error = %e, "rollback on drop failed");
            }
        }
    }
}

impl std::fmt::Debug for TransactionScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionScope")
            .field("txn_id", &self.txn_id)
            .field("status", &self.status)
            .finish()
    }
}
