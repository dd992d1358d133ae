//! Lifecycle orchestration
//!
//! Each form phase (construction, validation, save) runs as a small state
//! machine:
//!
//! ```text
//! Pending -> Before -> Around(body) -> After -> Done
//!               \          |             /
//!                +------> Failed <------+
//! ```
//!
//! Before and after hooks run in declaration order, parent schema first.
//! Around hooks form a middleware chain: each receives a [`Proceed`] handle
//! and must call [`Proceed::run`] to execute the inner hooks and the body.
//! A hook that returns without proceeding skips the body; the phase still
//! completes and its [`PhaseReport`] records `body_ran == false`.
//!
//! Any hook error aborts the phase and is returned unchanged.

use crate::form::Form;
use formwork_core::error::Result;
use formwork_core::types::Phase;
use std::sync::Arc;
use tracing::{debug, trace};

/// Before/after hook
pub type Hook = Arc<dyn Fn(&mut Form) -> Result<()> + Send + Sync>;

/// Around hook; must call [`Proceed::run`] to continue
pub type AroundHook = Arc<dyn for<'p> Fn(&mut Form, Proceed<'p>) -> Result<()> + Send + Sync>;

/// Body of a phase
pub type PhaseBody<'b> = dyn FnMut(&mut Form) -> Result<()> + 'b;

// ============================================================================
// Hook tables
// ============================================================================

/// Hooks registered for one phase
#[derive(Clone, Default)]
pub struct PhaseHooks {
    /// Run before the body, in order
    pub before: Vec<Hook>,
    /// Wrap the body; first entry is outermost
    pub around: Vec<AroundHook>,
    /// Run after the body, in order
    pub after: Vec<Hook>,
}

impl PhaseHooks {
    /// True if no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.around.is_empty() && self.after.is_empty()
    }

    fn extend(&mut self, other: &PhaseHooks) {
        self.before.extend(other.before.iter().cloned());
        self.around.extend(other.around.iter().cloned());
        self.after.extend(other.after.iter().cloned());
    }
}

/// Hooks for all three phases
#[derive(Clone, Default)]
pub struct Hooks {
    initialize: PhaseHooks,
    validation: PhaseHooks,
    save: PhaseHooks,
}

impl Hooks {
    /// Hooks registered for `phase`
    pub fn for_phase(&self, phase: Phase) -> &PhaseHooks {
        match phase {
            Phase::Initialize => &self.initialize,
            Phase::Validation => &self.validation,
            Phase::Save => &self.save,
        }
    }

    pub(crate) fn for_phase_mut(&mut self, phase: Phase) -> &mut PhaseHooks {
        match phase {
            Phase::Initialize => &mut self.initialize,
            Phase::Validation => &mut self.validation,
            Phase::Save => &mut self.save,
        }
    }

    /// Append `other`'s hooks after this table's, phase by phase
    pub(crate) fn extend(&mut self, other: &Hooks) {
        for phase in Phase::ALL {
            self.for_phase_mut(phase).extend(other.for_phase(phase));
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for phase in Phase::ALL {
            let hooks = self.for_phase(phase);
            list.entry(
                &phase.id(),
                &(hooks.before.len(), hooks.around.len(), hooks.after.len()),
            );
        }
        list.finish()
    }
}

// ============================================================================
// Proceed
// ============================================================================

/// Continuation handed to an around hook
///
/// Consumed by [`run`](Self::run), so the inner chain executes at most once.
pub struct Proceed<'p> {
    rest: &'p [AroundHook],
    body: &'p mut PhaseBody<'p>,
    body_ran: &'p mut bool,
}

impl<'p> Proceed<'p> {
    /// Run the remaining around hooks, then the phase body
    ///
    /// # Errors
    ///
    /// Returns whatever an inner hook or the body returns.
    pub fn run(self, form: &mut Form) -> Result<()> {
        let rest = self.rest;
        match rest.split_first() {
            Some((hook, rest)) => hook(
                form,
                Proceed {
                    rest,
                    body: self.body,
                    body_ran: self.body_ran,
                },
            ),
            None => {
                *self.body_ran = true;
                (self.body)(form)
            }
        }
    }
}

// ============================================================================
// Phase state
// ============================================================================

/// Position of a phase in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseState {
    /// Not started
    #[default]
    Pending,
    /// Running before hooks
    Before,
    /// Running around hooks and the body
    Around,
    /// Running after hooks
    After,
    /// Completed
    Done,
    /// Aborted by a hook or body error
    Failed,
}

/// Outcome of the most recent run of one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    /// Phase that ran
    pub phase: Phase,
    /// State the phase ended in
    pub state: PhaseState,
    /// True if the body executed (false when an around hook did not proceed)
    pub body_ran: bool,
}

impl PhaseReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            state: PhaseState::Pending,
            body_ran: false,
        }
    }

    /// True if the phase completed and its body executed
    pub fn completed(&self) -> bool {
        self.state == PhaseState::Done && self.body_ran
    }
}

/// Run `phase` on `form`: before hooks, the around chain wrapping `body`,
/// then after hooks
///
/// The report is recorded on the form whether the phase succeeds or fails.
///
/// # Errors
///
/// Returns the first error raised by a hook or by `body`.
pub fn run_phase(form: &mut Form, phase: Phase, body: &mut PhaseBody<'_>) -> Result<PhaseReport> {
    let schema = Arc::clone(form.schema());
    let hooks = schema.hooks().for_phase(phase);
    let mut report = PhaseReport::new(phase);

    let outcome = drive(form, hooks, body, &mut report);
    if let Err(e) = &outcome {
        report.state = PhaseState::Failed;
        debug!(form = schema.name(), %phase, error = %e, "phase aborted");
    } else {
        report.state = PhaseState::Done;
        if !report.body_ran {
            debug!(form = schema.name(), %phase, "around hook did not proceed, body skipped");
        }
    }
    form.record_phase(report);
    outcome.map(|()| report)
}

fn drive(
    form: &mut Form,
    hooks: &PhaseHooks,
    body: &mut PhaseBody<'_>,
    report: &mut PhaseReport,
) -> Result<()> {
    let phase = report.phase;

    report.state = PhaseState::Before;
    trace!(%phase, count = hooks.before.len(), "before hooks");
    for hook in &hooks.before {
        hook(form)?;
    }

    report.state = PhaseState::Around;
    trace!(%phase, count = hooks.around.len(), "around chain");
    let mut body_ran = false;
    let proceed = Proceed {
        rest: &hooks.around,
        body,
        body_ran: &mut body_ran,
    };
    let result = proceed.run(form);
    report.body_ran = body_ran;
    result?;

    report.state = PhaseState::After;
    trace!(%phase, count = hooks.after.len(), "after hooks");
    for hook in &hooks.after {
        hook(form)?;
    }
    Ok(())
}
