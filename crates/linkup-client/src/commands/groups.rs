use serde::Serialize;
use tracing::info;

use linkup_shared::models::{Group, Listing};
use linkup_shared::types::{BrowseFilter, GroupId};

use crate::catalog::{self, GroupFilter};
use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::navigation::Step;
use crate::state::Session;

/// One row of the group list screen.
#[derive(Debug, Clone, Serialize)]
pub struct GroupCard {
    pub group: Group,
    pub recommended: bool,
    pub joined: bool,
}

impl Session {
    /// Catalog groups passing `filter`, badged for the current user.
    pub fn group_listing(&mut self, filter: &GroupFilter) -> Result<Vec<GroupCard>, ClientError> {
        self.ensure_catalog()?;
        let user = self.current_user()?.clone();

        Ok(filter
            .apply(&self.catalog)
            .into_iter()
            .map(|group| GroupCard {
                recommended: catalog::is_recommended(&group, &user),
                joined: self.joined.iter().any(|g| g.id == group.id),
                group,
            })
            .collect())
    }

    /// Directory listings for the browse screen. Outside the browse step
    /// every section is searched.
    pub fn browse(&self, term: &str) -> Vec<Listing> {
        let filter = match self.navigator.step() {
            Step::Browse { filter } => *filter,
            _ => BrowseFilter::All,
        };
        catalog::search_listings(&self.listings, filter, term)
    }

    /// Join a catalog group. Returns `false` if it was already joined.
    pub fn join_group(&mut self, group_id: GroupId) -> Result<bool, ClientError> {
        if self.joined.iter().any(|g| g.id == group_id) {
            return Ok(false);
        }
        let user_id = self.current_user()?.id;
        let mut group = self
            .find_group(group_id)
            .cloned()
            .ok_or(ClientError::UnknownGroup(group_id))?;

        if let Some(db) = &self.database {
            db.insert_group(&group)?;
            db.add_member(group_id, user_id)?;
        }
        group.member_count += 1;
        if let Some(g) = self.catalog.iter_mut().find(|g| g.id == group_id) {
            g.member_count = group.member_count;
        }

        info!(group = %group_id, name = %group.name, user = %user_id, "Joined group");
        self.emit(SessionEvent::GroupJoined(group.clone()));
        self.joined.push(group);
        Ok(true)
    }

    pub fn joined_groups(&self) -> &[Group] {
        &self.joined
    }

    pub fn is_recommended(&mut self, group_id: GroupId) -> Result<bool, ClientError> {
        self.ensure_catalog()?;
        let group = self
            .find_group(group_id)
            .cloned()
            .ok_or(ClientError::UnknownGroup(group_id))?;
        let user = self.current_user()?;
        Ok(catalog::is_recommended(&group, user))
    }
}

#[cfg(test)]
mod tests {
    use linkup_shared::models::Location;
    use linkup_shared::types::{Persona, Scope, UserAction};
    use linkup_store::{Database, GroupQuery};

    use crate::config::ClientConfig;
    use crate::navigation::Fragment;

    use super::*;

    /// A business-join session sitting on the group list.
    fn on_group_list(db: Option<Database>) -> Session {
        let mut s = Session::with_database(ClientConfig::in_memory(4), db);
        s.select_persona_and_action(Persona::Business, UserAction::Join)
            .unwrap();
        s.submit_fragment(Fragment::Niche("bakery".into())).unwrap();
        s.save_location(Location::new("India", "Maharashtra", "Pune"))
            .unwrap();
        s
    }

    #[test]
    fn listing_badges_recommended_groups() {
        let mut s = on_group_list(None);
        let cards = s.group_listing(&GroupFilter::default()).unwrap();
        assert_eq!(cards.len(), 7);

        // Default preferred scope is local.
        let recommended: Vec<_> = cards
            .iter()
            .filter(|c| c.recommended)
            .map(|c| c.group.name.as_str())
            .collect();
        assert_eq!(recommended, vec!["bakery Professionals of India"]);
        assert!(cards.iter().all(|c| !c.joined));
    }

    #[test]
    fn listing_applies_filter() {
        let mut s = on_group_list(None);
        let cards = s
            .group_listing(&GroupFilter {
                search: "INDIA".into(),
                scope: Some(Scope::Regional),
            })
            .unwrap();
        let names: Vec<_> = cards.iter().map(|c| c.group.name.as_str()).collect();
        assert_eq!(names, vec!["India bakery Network", "Freelancers of India"]);
    }

    #[test]
    fn join_is_idempotent_and_persisted() {
        let mut s = on_group_list(Some(Database::open_in_memory().unwrap()));
        let group = s.group_listing(&GroupFilter::default()).unwrap()[0]
            .group
            .clone();

        assert!(s.join_group(group.id).unwrap());
        assert!(!s.join_group(group.id).unwrap());
        assert_eq!(s.joined_groups().len(), 1);
        assert_eq!(s.joined_groups()[0].member_count, group.member_count + 1);

        let db = s.database.as_ref().unwrap();
        assert_eq!(db.list_members(group.id).unwrap().len(), 1);
        assert_eq!(db.list_groups(&GroupQuery::default()).unwrap().len(), 1);

        let cards = s.group_listing(&GroupFilter::default()).unwrap();
        assert!(cards.iter().any(|c| c.joined && c.group.id == group.id));
    }

    #[test]
    fn join_unknown_group_fails() {
        let mut s = on_group_list(None);
        let missing = GroupId::new();
        assert!(matches!(
            s.join_group(missing),
            Err(ClientError::UnknownGroup(id)) if id == missing
        ));
    }

    #[test]
    fn browse_uses_step_filter() {
        let mut s = Session::with_database(ClientConfig::in_memory(4), None);
        assert_eq!(s.browse("").len(), catalog::mock_listings().len());

        s.select_persona_and_action(Persona::SocialMediaInfluencer, UserAction::View)
            .unwrap();
        let found = s.browse("");
        assert!(!found.is_empty());
        assert!(found
            .iter()
            .all(|l| l.persona == Persona::SocialMediaInfluencer));
    }

    #[test]
    fn recommendation_follows_preferred_scope() {
        let mut s = on_group_list(None);
        let cards = s.group_listing(&GroupFilter::default()).unwrap();
        let global = cards
            .iter()
            .find(|c| c.group.name == "Global bakery Community")
            .unwrap()
            .group
            .id;
        assert!(!s.is_recommended(global).unwrap());

        s.user.as_mut().unwrap().preferred_scope = Scope::Global;
        assert!(s.is_recommended(global).unwrap());
    }
}
