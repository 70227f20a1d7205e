//! CRUD operations for [`Group`] records and their members.

use chrono::{DateTime, Utc};
use rusqlite::params;
use rusqlite::types::Value;
use serde::Serialize;

use linkup_shared::constants::{TABLE_GROUPS, TABLE_GROUP_MEMBERS};
use linkup_shared::models::Group;
use linkup_shared::types::{GroupId, Scope, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::realtime::ChangeKind;
use crate::rows::{parsed_col, ts_col, ts_to_sql, uuid_col};

/// Optional predicates for [`Database::list_groups`]. All are ANDed.
#[derive(Debug, Clone, Default)]
pub struct GroupQuery {
    pub scope: Option<Scope>,
    /// Case-insensitive equality.
    pub niche: Option<String>,
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    pub public_only: bool,
}

#[derive(Debug, Serialize)]
struct MemberRow {
    group_id: GroupId,
    user_id: UserId,
    joined_at: DateTime<Utc>,
}

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Store a group. Returns `false` if a group with the same id exists.
    pub fn insert_group(&self, group: &Group) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO groups (id, name, description, member_count, scope, niche, is_public, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                group.id.0.to_string(),
                group.name,
                group.description,
                group.member_count,
                group.scope.as_str(),
                group.niche,
                group.is_public,
                ts_to_sql(&group.created_at),
            ],
        )?;

        if affected > 0 {
            self.hub().publish(ChangeKind::Insert, TABLE_GROUPS, group);
        }
        Ok(affected > 0)
    }

    /// Record a membership and bump the group's member count.
    /// Returns `false` if the user was already a member.
    pub fn add_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool> {
        let joined_at = Utc::now();
        let affected = self
            .conn()
            .execute(
                "INSERT OR IGNORE INTO group_members (group_id, user_id, joined_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    group_id.0.to_string(),
                    user_id.0.to_string(),
                    ts_to_sql(&joined_at)
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::NotFound
                }
                other => StoreError::Sqlite(other),
            })?;

        if affected == 0 {
            return Ok(false);
        }

        self.conn().execute(
            "UPDATE groups SET member_count = member_count + 1 WHERE id = ?1",
            params![group_id.0.to_string()],
        )?;

        self.hub().publish(
            ChangeKind::Insert,
            TABLE_GROUP_MEMBERS,
            &MemberRow {
                group_id,
                user_id,
                joined_at,
            },
        );
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_group(&self, id: GroupId) -> Result<Group> {
        self.conn()
            .query_row(
                "SELECT id, name, description, member_count, scope, niche, is_public, created_at
                 FROM groups WHERE id = ?1",
                params![id.0.to_string()],
                row_to_group,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List groups matching `query`, largest first.
    pub fn list_groups(&self, query: &GroupQuery) -> Result<Vec<Group>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Value> = Vec::new();

        if let Some(scope) = query.scope {
            args.push(Value::Text(scope.as_str().to_string()));
            clauses.push(format!("scope = ?{}", args.len()));
        }
        if let Some(niche) = query.niche.as_deref().filter(|n| !n.trim().is_empty()) {
            args.push(Value::Text(niche.trim().to_string()));
            clauses.push(format!("niche = ?{} COLLATE NOCASE", args.len()));
        }
        if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
            args.push(Value::Text(format!("%{}%", term.trim())));
            let n = args.len();
            clauses.push(format!("(name LIKE ?{n} OR description LIKE ?{n})"));
        }
        if query.public_only {
            clauses.push("is_public = 1".to_string());
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT id, name, description, member_count, scope, niche, is_public, created_at
             FROM groups {where_sql}
             ORDER BY member_count DESC, name ASC"
        );

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), row_to_group)?;

        let mut groups = Vec::new();
        for row in rows {
            groups.push(row?);
        }
        Ok(groups)
    }

    /// User ids of a group's members, in join order.
    pub fn list_members(&self, group_id: GroupId) -> Result<Vec<UserId>> {
        let mut stmt = self.conn().prepare(
            "SELECT user_id FROM group_members WHERE group_id = ?1 ORDER BY joined_at ASC",
        )?;

        let rows = stmt.query_map(params![group_id.0.to_string()], |row| {
            let s: String = row.get(0)?;
            Ok(UserId(uuid_col(0, &s)?))
        })?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row?);
        }
        Ok(members)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_group(row: &rusqlite::Row<'_>) -> rusqlite::Result<Group> {
    let id_str: String = row.get(0)?;
    let scope_str: String = row.get(4)?;
    let created_str: String = row.get(7)?;

    Ok(Group {
        id: GroupId(uuid_col(0, &id_str)?),
        name: row.get(1)?,
        description: row.get(2)?,
        member_count: row.get(3)?,
        scope: parsed_col::<Scope>(4, &scope_str)?,
        niche: row.get(5)?,
        is_public: row.get(6)?,
        created_at: ts_col(7, &created_str)?,
    })
}
