use std::collections::HashSet;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;

use linkup_shared::constants::MAX_MESSAGE_LEN;
use linkup_shared::models::{Message, User};
use linkup_shared::types::{GroupId, MessageId, UserId};

use crate::error::ChatError;

/// Members who "wrote" the seeded transcript, as (name, lines).
const MOCK_TRANSCRIPT: [(&str, &str); 5] = [
    ("Sarah Chen", "Welcome everyone! Introduce yourselves and what you're working on."),
    ("Marcus Johnson", "Hi all, Marcus here. Looking for partners for a weekend pop-up market."),
    ("Priya Patel", "Hello! I run a small design studio and I'm happy to share tips on branding."),
    ("Sarah Chen", "Great to have you both. We meet online every first Thursday."),
    ("Marcus Johnson", "Count me in for the next one."),
];

/// One group's conversation, in arrival order.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRoom {
    group_id: GroupId,
    messages: Vec<Message>,
    #[serde(skip)]
    seen: HashSet<MessageId>,
}

impl ChatRoom {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            messages: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// A room pre-filled with a short conversation between three members.
    pub fn with_mock_transcript(group_id: GroupId) -> Self {
        let mut room = Self::new(group_id);
        let authors: Vec<(&str, UserId)> = ["Sarah Chen", "Marcus Johnson", "Priya Patel"]
            .into_iter()
            .map(|name| (name, UserId::new()))
            .collect();

        let start = Utc::now() - Duration::minutes(MOCK_TRANSCRIPT.len() as i64 * 7);
        for (i, (name, content)) in MOCK_TRANSCRIPT.iter().enumerate() {
            let author_id = authors
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, id)| *id)
                .unwrap_or_default();
            let mut message = Message::new(group_id, author_id, *name, *content);
            message.created_at = start + Duration::minutes(i as i64 * 7);
            room.push(message);
        }
        room
    }

    /// Seed the room with stored history.
    pub fn with_history(group_id: GroupId, history: Vec<Message>) -> Self {
        let mut room = Self::new(group_id);
        for message in history {
            room.receive(message);
        }
        room
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message written by `author`.
    pub fn send(&mut self, author: &User, content: &str) -> Result<&Message, ChatError> {
        let message = self.compose(author, content)?;
        self.push(message);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Validate `content` and build the message `send` would append,
    /// without touching the room.
    pub fn compose(&self, author: &User, content: &str) -> Result<Message, ChatError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let len = content.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(ChatError::MessageTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            });
        }

        Ok(Message::new(self.group_id, author.id, author.name.clone(), content))
    }

    /// Append a message pushed by the change feed.
    ///
    /// Returns `false` when the message is for another group or has already
    /// been seen (the echo of one we sent).
    pub fn receive(&mut self, message: Message) -> bool {
        if message.group_id != self.group_id {
            debug!(group = %self.group_id, other = %message.group_id, "Ignoring message for other group");
            return false;
        }
        if self.seen.contains(&message.id) {
            return false;
        }
        self.push(message);
        true
    }

    fn push(&mut self, message: Message) {
        self.seen.insert(message.id);
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_transcript_has_five_messages_from_three_members() {
        let room = ChatRoom::with_mock_transcript(GroupId::new());
        assert_eq!(room.len(), 5);

        let authors: HashSet<_> = room.messages().iter().map(|m| m.author_id).collect();
        assert_eq!(authors.len(), 3);

        let times: Vec<_> = room.messages().iter().map(|m| m.created_at).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn send_appends_exactly_one() {
        let mut room = ChatRoom::with_mock_transcript(GroupId::new());
        let before: Vec<_> = room.messages().to_vec();
        let user = User::new("Ada", "software", "UK");

        let sent = room.send(&user, "Hello").unwrap().clone();
        assert_eq!(room.len(), 6);
        assert_eq!(&room.messages()[..5], &before[..]);
        assert_eq!(sent.content, "Hello");
        assert_eq!(sent.author_id, user.id);
        assert_eq!(room.messages()[5], sent);
    }

    #[test]
    fn send_rejects_blank_and_long() {
        let mut room = ChatRoom::new(GroupId::new());
        let user = User::new("Ada", "software", "UK");

        assert_eq!(room.send(&user, "  \n").unwrap_err(), ChatError::EmptyMessage);
        let long = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(
            room.send(&user, &long),
            Err(ChatError::MessageTooLong { .. })
        ));
        assert!(room.is_empty());
    }

    #[test]
    fn receive_ignores_echo_and_other_groups() {
        let group = GroupId::new();
        let mut room = ChatRoom::new(group);
        let user = User::new("Ada", "software", "UK");

        let sent = room.send(&user, "Hi").unwrap().clone();
        assert!(!room.receive(sent));
        assert!(!room.receive(Message::new(GroupId::new(), user.id, "Ada", "elsewhere")));

        let remote = Message::new(group, UserId::new(), "Bob", "Hey");
        assert!(room.receive(remote.clone()));
        assert_eq!(room.len(), 2);
        assert_eq!(room.messages()[1], remote);
    }

    #[test]
    fn arrival_order_is_kept() {
        let group = GroupId::new();
        let mut room = ChatRoom::new(group);
        let mut late = Message::new(group, UserId::new(), "Bob", "first to arrive");
        late.created_at += Duration::hours(1);
        let early = Message::new(group, UserId::new(), "Cy", "second to arrive");

        room.receive(late.clone());
        room.receive(early);
        assert_eq!(room.messages()[0], late);
    }
}
