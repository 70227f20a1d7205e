//! v001 -- Initial schema creation.
//!
//! Creates the five backend tables: `locations`, `users`, `groups`,
//! `group_members` and `messages`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Locations (country / state / city hierarchy)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS locations (
    country TEXT NOT NULL,
    state   TEXT NOT NULL,
    city    TEXT NOT NULL,

    PRIMARY KEY (country, state, city)
);

-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id              TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    name            TEXT NOT NULL,
    persona         TEXT,                       -- nullable until onboarding picks one
    niche           TEXT NOT NULL,
    country         TEXT NOT NULL,
    preferred_scope TEXT NOT NULL,
    bio             TEXT,
    avatar          TEXT,                       -- data: URL
    created_at      TEXT NOT NULL               -- RFC-3339, microseconds, UTC
);

-- ----------------------------------------------------------------
-- Groups
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS groups (
    id           TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    name         TEXT NOT NULL,
    description  TEXT NOT NULL,
    member_count INTEGER NOT NULL DEFAULT 0,
    scope        TEXT NOT NULL CHECK (scope IN ('local', 'regional', 'global')),
    niche        TEXT NOT NULL,
    is_public    INTEGER NOT NULL DEFAULT 1,    -- boolean 0/1
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_groups_scope ON groups(scope);

-- ----------------------------------------------------------------
-- Group membership
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS group_members (
    group_id  TEXT NOT NULL,                    -- FK -> groups(id)
    user_id   TEXT NOT NULL,
    joined_at TEXT NOT NULL,

    PRIMARY KEY (group_id, user_id),
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id          TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    group_id    TEXT NOT NULL,                  -- FK -> groups(id)
    author_id   TEXT NOT NULL,
    author_name TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,

    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_group_ts
    ON messages(group_id, created_at DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
