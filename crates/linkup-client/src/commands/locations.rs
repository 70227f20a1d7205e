use std::collections::BTreeSet;

use linkup_store::seed::SEED_LOCATIONS;

use crate::error::ClientError;
use crate::state::Session;

impl Session {
    /// Countries for the location screen's first selector.
    pub fn countries(&self) -> Result<Vec<String>, ClientError> {
        match &self.database {
            Some(db) => Ok(db.list_countries()?),
            None => Ok(seeded(|_| true, |&(country, _, _)| country)),
        }
    }

    pub fn states(&self, country: &str) -> Result<Vec<String>, ClientError> {
        match &self.database {
            Some(db) => Ok(db.list_states(country)?),
            None => Ok(seeded(|(c, _, _)| *c == country, |&(_, state, _)| state)),
        }
    }

    pub fn cities(&self, country: &str, state: &str) -> Result<Vec<String>, ClientError> {
        match &self.database {
            Some(db) => Ok(db.list_cities(country, state)?),
            None => Ok(seeded(
                |(c, s, _)| *c == country && *s == state,
                |&(_, _, city)| city,
            )),
        }
    }
}

type Triple = (&'static str, &'static str, &'static str);

/// Distinct, sorted values picked from the built-in location table.
fn seeded(
    keep: impl Fn(&Triple) -> bool,
    pick: impl Fn(&Triple) -> &'static str,
) -> Vec<String> {
    SEED_LOCATIONS
        .iter()
        .filter(|t| keep(t))
        .map(|t| pick(t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
