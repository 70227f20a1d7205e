use tracing::{debug, info};

use linkup_shared::constants::DEFAULT_HISTORY_LIMIT;
use linkup_shared::models::Message;
use linkup_shared::types::GroupId;

use crate::chat::ChatRoom;
use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::state::Session;

impl Session {
    /// Open a group's chat from the group list or browse screen.
    pub fn open_group(&mut self, group_id: GroupId) -> Result<&ChatRoom, ClientError> {
        self.ensure_catalog()?;
        if self.find_group(group_id).is_none() {
            return Err(ClientError::UnknownGroup(group_id));
        }
        self.navigator.open_group(group_id)?;
        self.ensure_room(group_id)?;
        self.step_changed();
        self.chats
            .get(&group_id)
            .ok_or(ClientError::UnknownGroup(group_id))
    }

    /// Send `content` to a group as the current user.
    pub fn send_message(&mut self, group_id: GroupId, content: &str) -> Result<Message, ClientError> {
        if self.find_group(group_id).is_none() {
            return Err(ClientError::UnknownGroup(group_id));
        }
        let user = self.current_user()?.clone();
        self.ensure_room(group_id)?;

        let room = self
            .chats
            .get_mut(&group_id)
            .ok_or(ClientError::UnknownGroup(group_id))?;
        let message = room.compose(&user, content)?;

        // The room only sees the message once the store has it.
        if let Some(db) = &self.database {
            db.insert_message(&message)?;
        }
        room.receive(message.clone());

        info!(msg_id = %message.id, group = %group_id, "Message sent");
        self.emit(SessionEvent::MessageAdded(message.clone()));
        Ok(message)
    }

    /// Messages of an opened room, oldest first. Empty if never opened.
    pub fn messages(&self, group_id: GroupId) -> &[Message] {
        self.chats
            .get(&group_id)
            .map(ChatRoom::messages)
            .unwrap_or(&[])
    }

    /// Hand a message pushed by the change feed to its room.
    ///
    /// Returns `true` if the message was new to an open room.
    pub fn deliver_remote(&mut self, message: Message) -> bool {
        let Some(room) = self.chats.get_mut(&message.group_id) else {
            debug!(group = %message.group_id, "No open room for incoming message");
            return false;
        };
        let event = SessionEvent::MessageAdded(message.clone());
        if !room.receive(message) {
            return false;
        }
        self.emit(event);
        true
    }

    /// A page of stored history, independent of the open room.
    pub fn load_history(
        &self,
        group_id: GroupId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>, ClientError> {
        Ok(self
            .store()?
            .get_messages_for_group(group_id, limit, offset)?)
    }

    /// Create the room for `group_id` if needed: stored history first,
    /// otherwise the sample transcript when enabled.
    fn ensure_room(&mut self, group_id: GroupId) -> Result<(), ClientError> {
        if self.chats.contains_key(&group_id) {
            return Ok(());
        }

        let room = match &self.database {
            Some(db) => {
                if let Some(group) = self.find_group(group_id) {
                    db.insert_group(group)?;
                }
                let history = db.get_messages_for_group(group_id, DEFAULT_HISTORY_LIMIT, 0)?;
                if history.is_empty() && self.config.seed_mock_chat {
                    let room = ChatRoom::with_mock_transcript(group_id);
                    for message in room.messages() {
                        db.insert_message(message)?;
                    }
                    room
                } else {
                    ChatRoom::with_history(group_id, history)
                }
            }
            None if self.config.seed_mock_chat => ChatRoom::with_mock_transcript(group_id),
            None => ChatRoom::new(group_id),
        };

        debug!(group = %group_id, messages = room.len(), "Chat room opened");
        self.chats.insert(group_id, room);
        Ok(())
    }
}
