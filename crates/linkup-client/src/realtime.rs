//! Pumps the store's change feed into open chat rooms.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use linkup_shared::constants::TABLE_MESSAGES;
use linkup_shared::models::Message;
use linkup_shared::types::GroupId;
use linkup_store::{ChangeEvent, ChangeFilter, ChangeKind};

use crate::error::ClientError;
use crate::state::Session;

/// A running group listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct ListenerHandle {
    group_id: GroupId,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!(group = %self.group_id, "Group listener stopped");
    }
}

/// Subscribe to inserts into `messages` for one group and deliver them to
/// the session's room. Must be called inside a tokio runtime.
pub fn spawn_group_listener(
    session: Arc<Mutex<Session>>,
    group_id: GroupId,
) -> Result<ListenerHandle, ClientError> {
    let mut subscription = {
        let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
        guard
            .store()?
            .subscribe(TABLE_MESSAGES, Some(ChangeFilter::eq("group_id", group_id)))
    };

    info!(group = %group_id, "Group listener started");

    let task = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            if !deliver(&session, event) {
                break;
            }
        }
        debug!(group = %group_id, "Change feed closed");
    });

    Ok(ListenerHandle { group_id, task })
}

/// Returns `false` once the session can no longer be used.
fn deliver(session: &Mutex<Session>, event: ChangeEvent) -> bool {
    if event.kind != ChangeKind::Insert {
        return true;
    }
    let message: Message = match serde_json::from_value(event.row) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Dropping malformed message row");
            return true;
        }
    };

    match session.lock() {
        Ok(mut guard) => {
            guard.deliver_remote(message);
            true
        }
        Err(_) => {
            warn!("Session lock poisoned; stopping listener");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use linkup_shared::models::{Group, Location};
    use linkup_shared::types::{Persona, UserAction, UserId};
    use linkup_store::Database;

    use crate::catalog::GroupFilter;
    use crate::config::ClientConfig;
    use crate::navigation::Fragment;

    use super::*;

    fn session_in_chat() -> (Arc<Mutex<Session>>, Group) {
        let db = Database::open_in_memory().unwrap();
        let mut s = Session::with_database(ClientConfig::in_memory(5), Some(db));
        s.select_persona_and_action(Persona::Business, UserAction::Join)
            .unwrap();
        s.submit_fragment(Fragment::Niche("cafe".into())).unwrap();
        s.save_location(Location::new("Germany", "Berlin", "Berlin"))
            .unwrap();
        let group = s.group_listing(&GroupFilter::default()).unwrap()[0]
            .group
            .clone();
        s.open_group(group.id).unwrap();
        (Arc::new(Mutex::new(s)), group)
    }

    /// Poll until the room has `n` messages or give up.
    async fn wait_for(session: &Arc<Mutex<Session>>, group: GroupId, n: usize) -> usize {
        for _ in 0..50 {
            let len = session.lock().unwrap().messages(group).len();
            if len >= n {
                return len;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        session.lock().unwrap().messages(group).len()
    }

    #[tokio::test]
    async fn remote_insert_reaches_room() {
        let (session, group) = session_in_chat();
        let _handle = spawn_group_listener(session.clone(), group.id).unwrap();

        let remote = Message::new(group.id, UserId::new(), "Bob", "from elsewhere");
        session
            .lock()
            .unwrap()
            .database
            .as_ref()
            .unwrap()
            .insert_message(&remote)
            .unwrap();

        assert_eq!(wait_for(&session, group.id, 6).await, 6);
        let last = session.lock().unwrap().messages(group.id)[5].clone();
        assert_eq!(last, remote);
    }

    #[tokio::test]
    async fn own_send_is_not_duplicated() {
        let (session, group) = session_in_chat();
        let _handle = spawn_group_listener(session.clone(), group.id).unwrap();

        session
            .lock()
            .unwrap()
            .send_message(group.id, "Hello")
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.lock().unwrap().messages(group.id).len(), 6);
    }

    #[tokio::test]
    async fn dropping_handle_stops_delivery() {
        let (session, group) = session_in_chat();
        let handle = spawn_group_listener(session.clone(), group.id).unwrap();
        drop(handle);
        tokio::task::yield_now().await;

        let remote = Message::new(group.id, UserId::new(), "Bob", "too late");
        session
            .lock()
            .unwrap()
            .database
            .as_ref()
            .unwrap()
            .insert_message(&remote)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.lock().unwrap().messages(group.id).len(), 5);
    }

    #[tokio::test]
    async fn listener_needs_store() {
        let session = Arc::new(Mutex::new(Session::with_database(
            ClientConfig::in_memory(5),
            None,
        )));
        assert!(matches!(
            spawn_group_listener(session, GroupId::new()),
            Err(ClientError::NoStore)
        ));
    }
}
