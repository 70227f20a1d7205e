//! Session commands.
//!
//! Each sub-module adds one group of methods to [`Session`]: the calls a UI
//! shell makes in response to user input.

pub mod groups;
pub mod locations;
pub mod messaging;
pub mod onboarding;
pub mod profile;

pub use groups::GroupCard;

use crate::events::SessionEvent;
use crate::navigation::Step;
use crate::state::Session;

impl Session {
    /// Announce the current step and hand back a copy of it.
    pub(crate) fn step_changed(&self) -> Step {
        let step = self.navigator.step().clone();
        self.emit(SessionEvent::StepChanged(step.clone()));
        step
    }
}
