//! Group catalog and business directory.
//!
//! Groups are generated locally from a fixed set of templates filled in with
//! the user's niche and country. Member counts come from the caller's RNG so
//! tests can seed them.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use linkup_shared::models::{Group, Listing, User};
use linkup_shared::types::{BrowseFilter, GroupId, Persona, Scope, UserId};

struct GroupTemplate {
    name: &'static str,
    description: &'static str,
    scope: Scope,
    /// Whether the group's niche is the user's niche or a fixed topic.
    niche: Option<&'static str>,
    is_public: bool,
}

const TEMPLATES: [GroupTemplate; 7] = [
    GroupTemplate {
        name: "{niche} Professionals of {country}",
        description: "Local meetups and referrals for {niche} professionals in {country}.",
        scope: Scope::Local,
        niche: None,
        is_public: true,
    },
    GroupTemplate {
        name: "{country} {niche} Network",
        description: "Regional network connecting {niche} specialists across {country}.",
        scope: Scope::Regional,
        niche: None,
        is_public: true,
    },
    GroupTemplate {
        name: "Global {niche} Community",
        description: "Worldwide discussion, jobs and resources for {niche}.",
        scope: Scope::Global,
        niche: None,
        is_public: true,
    },
    GroupTemplate {
        name: "{niche} Founders Circle",
        description: "Invite-only circle for owners building {niche} businesses.",
        scope: Scope::Regional,
        niche: None,
        is_public: false,
    },
    GroupTemplate {
        name: "{country} Small Business Owners",
        description: "Advice on permits, hiring and growth for small businesses in {country}.",
        scope: Scope::Local,
        niche: Some("small business"),
        is_public: true,
    },
    GroupTemplate {
        name: "Freelancers of {country}",
        description: "Gigs, rates and collaboration for independent workers in {country}.",
        scope: Scope::Regional,
        niche: Some("freelancing"),
        is_public: true,
    },
    GroupTemplate {
        name: "Creators & Influencers Worldwide",
        description: "Brand deals, analytics and content strategy for creators.",
        scope: Scope::Global,
        niche: Some("content creation"),
        is_public: true,
    },
];

/// Inclusive member-count range for a scope.
pub fn member_range(scope: Scope) -> (u32, u32) {
    match scope {
        Scope::Local => (20, 499),
        Scope::Regional => (200, 4_999),
        Scope::Global => (1_000, 49_999),
    }
}

fn fill(template: &str, niche: &str, country: &str) -> String {
    template.replace("{niche}", niche).replace("{country}", country)
}

/// Instantiate the catalog for `user`.
pub fn generate_groups<R: Rng>(user: &User, rng: &mut R) -> Vec<Group> {
    let niche = user.niche.trim();
    let country = user.country.trim();
    let created_at = Utc::now();

    TEMPLATES
        .iter()
        .map(|t| {
            let (lo, hi) = member_range(t.scope);
            Group {
                id: GroupId::new(),
                name: fill(t.name, niche, country),
                description: fill(t.description, niche, country),
                member_count: rng.gen_range(lo..=hi),
                scope: t.scope,
                niche: t.niche.unwrap_or(niche).to_string(),
                is_public: t.is_public,
                created_at,
            }
        })
        .collect()
}

/// Case-insensitive substring match on name or description. A blank term
/// keeps every group.
pub fn filter_by_search(groups: &[Group], term: &str) -> Vec<Group> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return groups.to_vec();
    }
    groups
        .iter()
        .filter(|g| {
            g.name.to_lowercase().contains(&term) || g.description.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

pub fn filter_by_scope(groups: &[Group], scope: Scope) -> Vec<Group> {
    groups.iter().filter(|g| g.scope == scope).cloned().collect()
}

/// Search box plus scope selector of the group listing screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    pub search: String,
    pub scope: Option<Scope>,
}

impl GroupFilter {
    pub fn apply(&self, groups: &[Group]) -> Vec<Group> {
        let found = filter_by_search(groups, &self.search);
        match self.scope {
            Some(scope) => filter_by_scope(&found, scope),
            None => found,
        }
    }
}

pub fn is_recommended(group: &Group, user: &User) -> bool {
    group.niche.trim().eq_ignore_ascii_case(user.niche.trim()) && group.scope == user.preferred_scope
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Built-in directory of businesses and providers for the browse screen.
pub fn mock_listings() -> Vec<Listing> {
    let rows: [(&str, Persona, &str, &str, &str, f32); 10] = [
        ("Crumbs Bakery", Persona::Business, "bakery", "Bengaluru", "India", 4.6),
        ("Northwind Traders", Persona::Business, "import & export", "Toronto", "Canada", 4.1),
        ("Greenleaf Cafe", Persona::Business, "cafe", "Austin", "United States", 4.4),
        ("Priya Raman", Persona::Freelancer, "graphic design", "Pune", "India", 4.9),
        ("Tom Becker", Persona::Freelancer, "web development", "Berlin", "Germany", 4.7),
        ("Ana Souza", Persona::Freelancer, "copywriting", "Manchester", "United Kingdom", 4.3),
        ("BrightSpark Electric", Persona::OccupationProvider, "electrician", "Mumbai", "India", 4.5),
        ("FlowRight Plumbing", Persona::OccupationProvider, "plumbing", "Vancouver", "Canada", 4.2),
        ("@wanderwithmia", Persona::SocialMediaInfluencer, "travel", "San Francisco", "United States", 4.8),
        ("@fitwithraj", Persona::SocialMediaInfluencer, "fitness", "Bengaluru", "India", 4.0),
    ];

    rows.into_iter()
        .map(|(name, persona, category, city, country, rating)| Listing {
            id: UserId::new(),
            name: name.to_string(),
            persona,
            category: category.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            rating,
        })
        .collect()
}

/// Listings in the `filter` section whose name, category or city contains
/// `term` (case-insensitive).
pub fn search_listings(listings: &[Listing], filter: BrowseFilter, term: &str) -> Vec<Listing> {
    let term = term.trim().to_lowercase();
    listings
        .iter()
        .filter(|l| filter.includes(l.persona))
        .filter(|l| {
            term.is_empty()
                || l.name.to_lowercase().contains(&term)
                || l.category.to_lowercase().contains(&term)
                || l.city.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn user() -> User {
        User::new("Ada", "Photography", "India")
    }

    #[test]
    fn generates_seven_groups_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let groups = generate_groups(&user(), &mut rng);
        assert_eq!(groups.len(), 7);

        for g in &groups {
            let (lo, hi) = member_range(g.scope);
            assert!((lo..=hi).contains(&g.member_count), "{} has {}", g.name, g.member_count);
            assert!(!g.name.contains('{'));
        }
        assert_eq!(groups[0].name, "Photography Professionals of India");
        assert_eq!(groups[0].niche, "Photography");
    }

    #[test]
    fn same_seed_same_counts() {
        let a = generate_groups(&user(), &mut StdRng::seed_from_u64(42));
        let b = generate_groups(&user(), &mut StdRng::seed_from_u64(42));
        let counts = |gs: &[Group]| gs.iter().map(|g| g.member_count).collect::<Vec<_>>();
        assert_eq!(counts(&a), counts(&b));
    }

    #[test]
    fn search_is_case_insensitive_and_blank_keeps_all() {
        let groups = generate_groups(&user(), &mut StdRng::seed_from_u64(1));
        assert_eq!(filter_by_search(&groups, "   ").len(), groups.len());

        let found = filter_by_search(&groups, "FREELANC");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Freelancers of India");
    }

    #[test]
    fn scope_and_search_commute() {
        let groups = generate_groups(&user(), &mut StdRng::seed_from_u64(3));
        for scope in Scope::ALL {
            for term in ["", "india", "photography", "creators", "zzz"] {
                let a = filter_by_scope(&filter_by_search(&groups, term), scope);
                let b = filter_by_search(&filter_by_scope(&groups, scope), term);
                assert_eq!(a, b, "scope={scope} term={term}");
            }
        }
    }

    #[test]
    fn group_filter_applies_both() {
        let groups = generate_groups(&user(), &mut StdRng::seed_from_u64(5));
        let filter = GroupFilter {
            search: "photography".into(),
            scope: Some(Scope::Global),
        };
        let found = filter.apply(&groups);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Global Photography Community");
    }

    #[test]
    fn recommended_needs_niche_and_scope() {
        let mut u = user();
        u.niche = "photography".into();
        u.preferred_scope = Scope::Regional;
        let groups = generate_groups(&u, &mut StdRng::seed_from_u64(9));

        let recommended: Vec<_> = groups
            .iter()
            .filter(|g| is_recommended(g, &u))
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(recommended, vec!["India photography Network", "photography Founders Circle"]);
    }

    #[test]
    fn listings_by_section_and_term() {
        let listings = mock_listings();
        assert_eq!(search_listings(&listings, BrowseFilter::All, "").len(), listings.len());

        let freelancers = search_listings(&listings, BrowseFilter::Freelancers, "");
        assert!(freelancers.iter().all(|l| l.persona == Persona::Freelancer));

        let found = search_listings(&listings, BrowseFilter::LocalServices, "mumbai");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "BrightSpark Electric");
    }
}
