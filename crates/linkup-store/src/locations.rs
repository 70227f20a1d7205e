//! Country / state / city lookups backing the location picker.

use rusqlite::params;

use linkup_shared::constants::TABLE_LOCATIONS;
use linkup_shared::models::Location;

use crate::database::Database;
use crate::error::Result;
use crate::realtime::ChangeKind;

impl Database {
    /// Insert a location. Returns `false` if it was already known.
    pub fn insert_location(&self, location: &Location) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO locations (country, state, city) VALUES (?1, ?2, ?3)",
            params![location.country, location.state, location.city],
        )?;

        if affected > 0 {
            self.hub().publish(ChangeKind::Insert, TABLE_LOCATIONS, location);
        }
        Ok(affected > 0)
    }

    pub fn list_countries(&self) -> Result<Vec<String>> {
        self.distinct_strings(
            "SELECT DISTINCT country FROM locations ORDER BY country ASC",
            &[],
        )
    }

    pub fn list_states(&self, country: &str) -> Result<Vec<String>> {
        self.distinct_strings(
            "SELECT DISTINCT state FROM locations WHERE country = ?1 ORDER BY state ASC",
            &[country],
        )
    }

    pub fn list_cities(&self, country: &str, state: &str) -> Result<Vec<String>> {
        self.distinct_strings(
            "SELECT city FROM locations WHERE country = ?1 AND state = ?2 ORDER BY city ASC",
            &[country, state],
        )
    }

    fn distinct_strings(&self, sql: &str, args: &[&str]) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| row.get(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use linkup_shared::models::Location;

    #[test]
    fn seeded_hierarchy_is_queryable() {
        let db = Database::open_in_memory().unwrap();

        let countries = db.list_countries().unwrap();
        assert!(countries.contains(&"India".to_string()));

        let states = db.list_states("India").unwrap();
        assert_eq!(states, vec!["Karnataka", "Maharashtra"]);

        let cities = db.list_cities("India", "Maharashtra").unwrap();
        assert_eq!(cities, vec!["Mumbai", "Pune"]);
    }

    #[test]
    fn insert_location_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let loc = Location::new("Kenya", "Nairobi", "Nairobi");

        assert!(db.insert_location(&loc).unwrap());
        assert!(!db.insert_location(&loc).unwrap());
        assert_eq!(db.list_states("Kenya").unwrap(), vec!["Nairobi"]);
    }

    #[test]
    fn unknown_country_has_no_states() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_states("Atlantis").unwrap().is_empty());
    }
}
