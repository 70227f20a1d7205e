use serde::Serialize;
use tokio::sync::broadcast;

use linkup_shared::models::{Group, Message, User};

use crate::navigation::Step;

pub const EVENT_STEP_CHANGED: &str = "step-changed";
pub const EVENT_GROUP_JOINED: &str = "group-joined";
pub const EVENT_MESSAGE_ADDED: &str = "message-added";
pub const EVENT_PROFILE_UPDATED: &str = "profile-updated";

/// Capacity of the session event channel.
pub const EVENT_BUFFER: usize = 64;

/// Notifications a UI shell re-renders on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum SessionEvent {
    StepChanged(Step),
    GroupJoined(Group),
    MessageAdded(Message),
    ProfileUpdated(User),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::StepChanged(_) => EVENT_STEP_CHANGED,
            SessionEvent::GroupJoined(_) => EVENT_GROUP_JOINED,
            SessionEvent::MessageAdded(_) => EVENT_MESSAGE_ADDED,
            SessionEvent::ProfileUpdated(_) => EVENT_PROFILE_UPDATED,
        }
    }
}

/// Broadcast `event`. Having no listener is not an error.
pub fn emit_event(tx: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    let name = event.name();
    match tx.send(event) {
        Ok(receivers) => tracing::trace!(event = name, receivers, "Event emitted"),
        Err(_) => tracing::trace!(event = name, "No event listeners"),
    }
}
