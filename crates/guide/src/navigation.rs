//! Forward/backward movement through the assembly steps.

use serde::Serialize;
use shared::StepNumber;

use crate::error::GuideError;
use crate::state::{SessionActions, SessionStore};

/// What happened after the user pressed "done" on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepTransition {
    /// Moved on to the next step
    Moved { to: StepNumber },
    /// The last step was finished; the caller shows the completion screen
    AssemblyComplete,
}

/// Mark the current step completed and move to the next one.
pub fn advance(store: &mut SessionStore) -> Result<StepTransition, GuideError> {
    let current = store.current_step();
    if !store.is_completed(current) {
        store.complete_step(current)?;
    }

    if current >= store.total_steps() {
        tracing::info!(
            "Assembly complete ({}/{} steps)",
            store.completed_steps().len(),
            store.total_steps()
        );
        return Ok(StepTransition::AssemblyComplete);
    }

    let next = current + 1;
    store.set_current_step(next)?;
    Ok(StepTransition::Moved { to: next })
}

/// Go back one step. Returns `false` (and changes nothing) on the first step.
pub fn retreat(store: &mut SessionStore) -> bool {
    let current = store.current_step();
    if current <= 1 {
        return false;
    }
    store.set_current_step(current - 1).is_ok()
}

/// Jump straight to a step (deep link). Nothing is marked completed.
pub fn go_to_step(store: &mut SessionStore, step: StepNumber) -> Result<(), GuideError> {
    store.set_current_step(step)
}
