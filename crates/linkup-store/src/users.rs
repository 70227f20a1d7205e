//! CRUD operations for [`User`] records.

use rusqlite::{params, OptionalExtension};

use linkup_shared::constants::TABLE_USERS;
use linkup_shared::models::User;
use linkup_shared::types::{Persona, Scope, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::realtime::ChangeKind;
use crate::rows::{parsed_col, ts_col, ts_to_sql, uuid_col};

impl Database {
    /// Insert a user, or overwrite the editable fields of an existing one.
    pub fn upsert_user(&self, user: &User) -> Result<()> {
        let existed: bool = self
            .conn()
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![user.id.0.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();

        self.conn().execute(
            "INSERT INTO users (id, name, persona, niche, country, preferred_scope, bio, avatar, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                persona = excluded.persona,
                niche = excluded.niche,
                country = excluded.country,
                preferred_scope = excluded.preferred_scope,
                bio = excluded.bio,
                avatar = excluded.avatar",
            params![
                user.id.0.to_string(),
                user.name,
                user.persona.map(|p| p.as_str()),
                user.niche,
                user.country,
                user.preferred_scope.as_str(),
                user.bio,
                user.avatar,
                ts_to_sql(&user.created_at),
            ],
        )?;

        let kind = if existed {
            ChangeKind::Update
        } else {
            ChangeKind::Insert
        };
        self.hub().publish(kind, TABLE_USERS, user);
        Ok(())
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, name, persona, niche, country, preferred_scope, bio, avatar, created_at
                 FROM users WHERE id = ?1",
                params![id.0.to_string()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let persona_str: Option<String> = row.get(2)?;
    let scope_str: String = row.get(5)?;
    let created_str: String = row.get(8)?;

    let persona = persona_str
        .map(|s| parsed_col::<Persona>(2, &s))
        .transpose()?;

    Ok(User {
        id: UserId(uuid_col(0, &id_str)?),
        name: row.get(1)?,
        persona,
        niche: row.get(3)?,
        country: row.get(4)?,
        preferred_scope: parsed_col::<Scope>(5, &scope_str)?,
        bio: row.get(6)?,
        avatar: row.get(7)?,
        created_at: ts_col(8, &created_str)?,
    })
}
