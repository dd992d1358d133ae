//! Transaction layer for formwork
//!
//! This crate implements the all-or-nothing scope around owner persistence:
//! - UnitOfWork: the transactional-resource contract injected into a form
//! - TransactionScope: begin/commit/rollback state machine, released on every
//!   exit path
//! - MemoryStore: in-memory snapshot/rollback store for embedding and tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;
pub mod transaction;
pub mod unit_of_work;

pub use store::MemoryStore;
pub use transaction::{TransactionScope, TransactionStatus};
pub use unit_of_work::{NoTransaction, UnitOfWork};
