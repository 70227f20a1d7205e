use rusqlite::params;

use linkup_shared::constants::TABLE_MESSAGES;
use linkup_shared::models::Message;
use linkup_shared::types::{GroupId, MessageId, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::realtime::ChangeKind;
use crate::rows::{ts_col, ts_to_sql, uuid_col};

impl Database {
    /// Insert a message and notify `messages` subscribers.
    ///
    /// Fails with [`StoreError::NotFound`] if the group does not exist.
    pub fn insert_message(&self, message: &Message) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO messages (id, group_id, author_id, author_name, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    message.id.0.to_string(),
                    message.group_id.0.to_string(),
                    message.author_id.0.to_string(),
                    message.author_name,
                    message.content,
                    ts_to_sql(&message.created_at),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, Some(ref msg))
                    if err.code == rusqlite::ErrorCode::ConstraintViolation
                        && msg.contains("FOREIGN KEY") =>
                {
                    StoreError::NotFound
                }
                other => StoreError::Sqlite(other),
            })?;

        self.hub().publish(ChangeKind::Insert, TABLE_MESSAGES, message);
        Ok(())
    }

    /// A page of a group's history, returned oldest first.
    ///
    /// `offset` counts back from the newest message, so `(50, 0)` is the
    /// latest fifty and `(50, 50)` the fifty before them.
    pub fn get_messages_for_group(
        &self,
        group_id: GroupId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, group_id, author_id, author_name, content, created_at FROM (
                 SELECT rowid AS seq, id, group_id, author_id, author_name, content, created_at
                 FROM messages
                 WHERE group_id = ?1
                 ORDER BY created_at DESC, seq DESC
                 LIMIT ?2 OFFSET ?3
             )
             ORDER BY created_at ASC, seq ASC",
        )?;

        let rows = stmt.query_map(
            params![group_id.0.to_string(), limit, offset],
            row_to_message,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    pub fn get_message(&self, id: MessageId) -> Result<Message> {
        self.conn()
            .query_row(
                "SELECT id, group_id, author_id, author_name, content, created_at
                 FROM messages WHERE id = ?1",
                params![id.0.to_string()],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    pub fn count_messages(&self, group_id: GroupId) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM messages WHERE group_id = ?1",
            params![group_id.0.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let group_id_str: String = row.get(1)?;
    let author_str: String = row.get(2)?;
    let ts_str: String = row.get(5)?;

    Ok(Message {
        id: MessageId(uuid_col(0, &id_str)?),
        group_id: GroupId(uuid_col(1, &group_id_str)?),
        author_id: UserId(uuid_col(2, &author_str)?),
        author_name: row.get(3)?,
        content: row.get(4)?,
        created_at: ts_col(5, &ts_str)?,
    })
}
