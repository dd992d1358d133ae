//! Transactional-resource contract
//!
//! A form never reaches for an ambient transaction. The caller hands it a
//! [`UnitOfWork`] and the persistence step calls `begin`, then exactly one of
//! `commit` or `rollback`.

use formwork_core::error::Result;
use std::sync::Arc;

/// Resource whose writes can be grouped and undone as a unit
///
/// Implementations use interior mutability: a form holds the handle behind a
/// shared reference for its whole lifetime.
pub trait UnitOfWork: Send + Sync {
    /// Open a transaction
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already open or the resource
    /// cannot start one.
    fn begin(&self) -> Result<()>;

    /// Make every write since `begin` durable
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open or the commit fails.
    fn commit(&self) -> Result<()>;

    /// Discard every write since `begin`
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn rollback(&self) -> Result<()>;
}

impl<T: UnitOfWork + ?Sized> UnitOfWork for Arc<T> {
    fn begin(&self) -> Result<()> {
        (**self).begin()
    }

    fn commit(&self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<()> {
        (**self).rollback()
    }
}

/// Unit of work that groups nothing
///
/// Used when no resource was injected: owners persist independently and a
/// failed save cannot undo earlier owners' writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransaction;

impl UnitOfWork for NoTransaction {
    fn begin(&self) -> Result<()> {
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        Ok(())
    }
}
