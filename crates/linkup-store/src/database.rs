//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation. It also owns the
//! [`RealtimeHub`] that every write helper publishes to.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use linkup_shared::constants::REALTIME_BUFFER;

use crate::error::{Result, StoreError};
use crate::migrations;
use crate::realtime::{ChangeFilter, RealtimeHub, Subscription};

/// Wrapper around a [`rusqlite::Connection`] plus its change feed.
pub struct Database {
    conn: Connection,
    hub: RealtimeHub,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/linkup/linkup.db`
    /// - macOS:   `~/Library/Application Support/com.linkup.linkup/linkup.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\linkup\linkup\data\linkup.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "linkup", "linkup").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("linkup.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Open a throwaway database that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            hub: RealtimeHub::new(REALTIME_BUFFER),
        })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for transactions or ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// The change feed written to by every insert/update helper.
    pub fn hub(&self) -> &RealtimeHub {
        &self.hub
    }

    /// Shorthand for `self.hub().subscribe(table, filter)`.
    pub fn subscribe(&self, table: &str, filter: Option<ChangeFilter>) -> Subscription {
        self.hub.subscribe(table, filter)
    }

    /// Return the filesystem path of the open database (`None` in memory).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());
    }

    #[test]
    fn reopen_keeps_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        drop(Database::open_at(&path).unwrap());
        let db = Database::open_at(&path).unwrap();

        let version: u32 = db
            .conn()
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, migrations::CURRENT_VERSION);
    }

    #[test]
    fn in_memory_has_no_path() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.path().is_none());
    }
}
