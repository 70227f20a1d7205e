use tracing::info;

use linkup_shared::models::Location;
use linkup_shared::types::{Persona, UserAction};

use crate::error::ClientError;
use crate::navigation::{Fragment, NavEvent, Step};
use crate::state::{user_from_context, Session};

impl Session {
    pub fn step(&self) -> &Step {
        self.navigator.step()
    }

    /// Apply a screen event, e.g. one deserialized from a UI shell.
    pub fn apply(&mut self, event: NavEvent) -> Result<Step, ClientError> {
        match event {
            NavEvent::SelectPersonaAndAction { persona, action } => {
                self.select_persona_and_action(persona, action)
            }
            NavEvent::Submit { fragment } => self.submit_fragment(fragment),
            NavEvent::ConfirmPreview => self.confirm_preview(),
            NavEvent::Restart => Ok(self.restart()),
            NavEvent::OpenGroup { group_id } => {
                self.open_group(group_id)?;
                Ok(self.step().clone())
            }
            other => {
                self.navigator.apply(other)?;
                Ok(self.step_changed())
            }
        }
    }

    pub fn select_persona_and_action(
        &mut self,
        persona: Persona,
        action: UserAction,
    ) -> Result<Step, ClientError> {
        self.navigator.select_persona_and_action(persona, action)?;
        // A new persona starts a new user.
        self.forget_user();
        info!(%persona, %action, step = %self.navigator.step().kind(), "Persona selected");
        Ok(self.step_changed())
    }

    /// Continue from a wizard screen with the fragment its form produced.
    pub fn submit_fragment(&mut self, fragment: Fragment) -> Result<Step, ClientError> {
        self.navigator.submit(fragment)?;
        self.context_changed();
        Ok(self.step_changed())
    }

    pub fn save_location(&mut self, location: Location) -> Result<Step, ClientError> {
        self.navigator.save_location(location)?;
        self.context_changed();
        Ok(self.step_changed())
    }

    /// Confirm a preview: registers the user and moves to the group list.
    pub fn confirm_preview(&mut self) -> Result<Step, ClientError> {
        let user = user_from_context(self.navigator.context())?;
        self.navigator.confirm_preview()?;
        self.register(user)?;
        Ok(self.step_changed())
    }

    pub fn go_back(&mut self) -> Result<Step, ClientError> {
        self.navigator.back()?;
        Ok(self.step_changed())
    }

    /// Start over from persona selection with a fresh session.
    pub fn restart(&mut self) -> Step {
        self.reset();
        info!("Session restarted");
        self.step_changed()
    }
}
