//! Row-change notifications.
//!
//! Every write helper on [`Database`](crate::Database) publishes a
//! [`ChangeEvent`] on a tokio broadcast channel. Consumers take a
//! [`Subscription`] scoped to one table and, optionally, one
//! `column=eq.value` filter. Dropping the subscription unsubscribes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use linkup_shared::constants::SCHEMA_PUBLIC;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single row change, shaped like the hosted backend's payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub schema: String,
    pub table: String,
    pub row: serde_json::Value,
}

/// Equality filter on one column of the changed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub column: String,
    pub value: String,
}

impl ChangeFilter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Parse `column=eq.value`.
    pub fn parse(s: &str) -> Result<Self> {
        let (column, rest) = s
            .split_once('=')
            .ok_or_else(|| StoreError::InvalidFilter(s.to_string()))?;
        let value = rest
            .strip_prefix("eq.")
            .ok_or_else(|| StoreError::InvalidFilter(s.to_string()))?;

        if column.trim().is_empty() || value.is_empty() {
            return Err(StoreError::InvalidFilter(s.to_string()));
        }

        Ok(Self::eq(column.trim(), value))
    }

    pub fn matches(&self, row: &serde_json::Value) -> bool {
        match row.get(&self.column) {
            Some(serde_json::Value::String(s)) => *s == self.value,
            Some(serde_json::Value::Number(n)) => n.to_string() == self.value,
            Some(serde_json::Value::Bool(b)) => b.to_string() == self.value,
            _ => false,
        }
    }
}

/// Fan-out point for change events. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RealtimeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a change for `row`. Having no subscribers is not an error.
    pub fn publish<T: Serialize>(&self, kind: ChangeKind, table: &str, row: &T) {
        let row = match serde_json::to_value(row) {
            Ok(v) => v,
            Err(e) => {
                warn!(table, error = %e, "Dropping change event with unserializable row");
                return;
            }
        };

        let event = ChangeEvent {
            kind,
            schema: SCHEMA_PUBLIC.to_string(),
            table: table.to_string(),
            row,
        };

        match self.tx.send(event) {
            Ok(receivers) => debug!(table, ?kind, receivers, "Change published"),
            Err(_) => debug!(table, ?kind, "Change published with no subscribers"),
        }
    }

    pub fn subscribe(&self, table: &str, filter: Option<ChangeFilter>) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            table: table.to_string(),
            filter,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A filtered view of the hub.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
    table: String,
    filter: Option<ChangeFilter>,
}

impl Subscription {
    /// Wait for the next matching event. `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(table = %self.table, skipped, "Realtime subscriber lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn accepts(&self, event: &ChangeEvent) -> bool {
        event.table == self.table
            && self
                .filter
                .as_ref()
                .map_or(true, |f| f.matches(&event.row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_filter() {
        let f = ChangeFilter::parse("group_id=eq.abc").unwrap();
        assert_eq!(f.column, "group_id");
        assert_eq!(f.value, "abc");

        assert!(ChangeFilter::parse("group_id=abc").is_err());
        assert!(ChangeFilter::parse("group_id").is_err());
        assert!(ChangeFilter::parse("=eq.abc").is_err());
    }

    #[test]
    fn test_filter_matches_strings_and_numbers() {
        let row = json!({ "group_id": "abc", "member_count": 12 });
        assert!(ChangeFilter::eq("group_id", "abc").matches(&row));
        assert!(ChangeFilter::eq("member_count", 12).matches(&row));
        assert!(!ChangeFilter::eq("group_id", "xyz").matches(&row));
        assert!(!ChangeFilter::eq("missing", "abc").matches(&row));
    }

    #[tokio::test]
    async fn test_subscription_skips_other_tables_and_rows() {
        let hub = RealtimeHub::new(16);
        let mut sub = hub.subscribe("messages", Some(ChangeFilter::eq("group_id", "g1")));

        hub.publish(ChangeKind::Insert, "groups", &json!({ "group_id": "g1" }));
        hub.publish(ChangeKind::Insert, "messages", &json!({ "group_id": "g2" }));
        hub.publish(ChangeKind::Insert, "messages", &json!({ "group_id": "g1", "n": 1 }));

        let event = sub.recv().await.unwrap();
        assert_eq!(event.table, "messages");
        assert_eq!(event.schema, "public");
        assert_eq!(event.row["n"], 1);
    }

    #[tokio::test]
    async fn test_subscription_ends_when_hub_dropped() {
        let hub = RealtimeHub::new(4);
        let mut sub = hub.subscribe("messages", None);
        drop(hub);
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let hub = RealtimeHub::new(4);
        hub.publish(ChangeKind::Update, "users", &json!({ "id": 1 }));
        assert_eq!(hub.subscriber_count(), 0);
    }
}
