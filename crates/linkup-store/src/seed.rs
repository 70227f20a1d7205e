//! Built-in location hierarchy.
//!
//! Loaded into the `locations` table by migration v002 and used directly by
//! clients that run without a store.

/// `(country, state, city)` triples.
pub const SEED_LOCATIONS: &[(&str, &str, &str)] = &[
    ("Canada", "Ontario", "Ottawa"),
    ("Canada", "Ontario", "Toronto"),
    ("Germany", "Bavaria", "Munich"),
    ("Germany", "Berlin", "Berlin"),
    ("India", "Karnataka", "Bengaluru"),
    ("India", "Maharashtra", "Mumbai"),
    ("India", "Maharashtra", "Pune"),
    ("Nigeria", "Lagos", "Ikeja"),
    ("Nigeria", "Lagos", "Lagos"),
    ("United Kingdom", "England", "London"),
    ("United Kingdom", "England", "Manchester"),
    ("United Kingdom", "Scotland", "Edinburgh"),
    ("United States", "California", "Los Angeles"),
    ("United States", "California", "San Francisco"),
    ("United States", "New York", "Buffalo"),
    ("United States", "New York", "New York City"),
    ("United States", "Texas", "Austin"),
];
