//! v002 -- Seed the location hierarchy used by the location picker.

use rusqlite::{params, Connection};

use crate::seed::SEED_LOCATIONS;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    let mut stmt = conn
        .prepare("INSERT OR IGNORE INTO locations (country, state, city) VALUES (?1, ?2, ?3)")?;
    for (country, state, city) in SEED_LOCATIONS {
        stmt.execute(params![country, state, city])?;
    }
    Ok(())
}
