//! formwork - composite form objects over many owners
//!
//! A form presents one flat attribute surface while routing reads and writes
//! to the owners that actually hold the data, aggregating their validation
//! outcomes, and persisting them as one unit.
//!
//! # Quick Start
//!
//! ```ignore
//! use formwork::{FieldOptions, Form, FormSchema, Input, SaveOptions};
//!
//! let schema = FormSchema::builder("SignupForm")
//!     .field("email", FieldOptions::owner("user").writable())
//!     .field("plan", FieldOptions::owner("billing").writable())
//!     .field("terms", FieldOptions::owner("self"))
//!     .validates_presence_of("terms")
//!     .build()?;
//!
//! let mut form = Form::builder(&schema)
//!     .params(Input::untrusted(request_params))
//!     .init(|form| {
//!         form.bind("user", user.clone())?;
//!         form.bind("billing", billing.clone())
//!     })
//!     .build()?;
//!
//! if !form.save(SaveOptions::new())? {
//!     render(form.errors());
//! }
//! ```
//!
//! # Architecture
//!
//! - `formwork-core`: values, input trust levels, errors collection, error type
//! - `formwork-concurrency`: unit of work and transaction scope
//! - `formwork-engine`: registries, routing, validation, lifecycle, save

pub use formwork_concurrency::{
    MemoryStore, NoTransaction, TransactionScope, TransactionStatus, UnitOfWork,
};
pub use formwork_core::{
    humanize, Attributes, Capability, Errors, FormError, Input, OwnerKey, Phase, Result,
    UntrustedParams, Value,
};
pub use formwork_engine::*;
