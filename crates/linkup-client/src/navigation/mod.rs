//! Step/navigation model: which screen is shown, and what the wizard has
//! collected so far.

pub mod context;
pub mod machine;
pub mod step;

pub use context::{Fragment, WizardContext};
pub use machine::{select_persona_and_action, transition, NavEvent, Navigator};
pub use step::{Step, StepKind};
