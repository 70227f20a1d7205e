//! Wizard screen forms.
//!
//! Each form holds the raw field values a screen is editing. Continue is
//! enabled once [`WizardForm::is_complete`] holds; [`WizardForm::submit`]
//! then produces the screen's output (a [`Fragment`] for wizard screens).

use std::path::Path;

use serde::{Deserialize, Serialize};

use linkup_shared::models::{
    BusinessProfile, GigProfile, InfluencerProfile, Location, MediaFile, Portfolio,
    ServiceSelection,
};
use linkup_shared::types::Scope;

use crate::error::{FormError, MediaError};
use crate::media;
use crate::navigation::Fragment;

pub trait WizardForm {
    type Output;

    /// Required fields that are still blank.
    fn missing_fields(&self) -> Vec<&'static str>;

    /// Assemble the output. Only called once nothing is missing.
    fn build(&self) -> Result<Self::Output, FormError>;

    fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn submit(&self) -> Result<Self::Output, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }
        self.build()
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn optional(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn optional_number<T: std::str::FromStr>(field: &'static str, s: &str) -> Result<Option<T>, FormError> {
    match optional(s) {
        None => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|_| FormError::Invalid {
            field,
            reason: format!("'{v}' is not a whole number"),
        }),
    }
}

fn trimmed_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Business profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessProfileForm {
    pub name: String,
    pub category: String,
    pub description: String,
    pub website: String,
}

impl WizardForm for BusinessProfileForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.category) {
            missing.push("category");
        }
        if blank(&self.description) {
            missing.push("description");
        }
        missing
    }

    fn build(&self) -> Result<Fragment, FormError> {
        Ok(Fragment::Business(BusinessProfile {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            website: optional(&self.website),
        }))
    }
}

// ---------------------------------------------------------------------------
// Niche (business join, influencer join)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NicheForm {
    pub niche: String,
}

impl WizardForm for NicheForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        if blank(&self.niche) {
            vec!["niche"]
        } else {
            Vec::new()
        }
    }

    fn build(&self) -> Result<Fragment, FormError> {
        Ok(Fragment::Niche(self.niche.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Freelancer gig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GigForm {
    pub title: String,
    pub category: String,
    pub skills: Vec<String>,
    pub description: String,
    pub hourly_rate: String,
}

impl WizardForm for GigForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("title");
        }
        if blank(&self.category) {
            missing.push("category");
        }
        if trimmed_list(&self.skills).is_empty() {
            missing.push("skills");
        }
        if blank(&self.description) {
            missing.push("description");
        }
        missing
    }

    fn build(&self) -> Result<Fragment, FormError> {
        Ok(Fragment::Gig(GigProfile {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            skills: trimmed_list(&self.skills),
            description: self.description.trim().to_string(),
            hourly_rate: optional_number("hourly_rate", &self.hourly_rate)?,
        }))
    }
}

// ---------------------------------------------------------------------------
// Portfolio upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioForm {
    pub items: Vec<MediaFile>,
}

impl PortfolioForm {
    pub fn add_file(&mut self, path: &Path) -> Result<&MediaFile, MediaError> {
        let file = media::read_media_file(path)?;
        self.items.push(file);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn add_bytes(&mut self, file_name: &str, bytes: &[u8]) -> Result<&MediaFile, MediaError> {
        let file = media::media_from_bytes(file_name, bytes)?;
        self.items.push(file);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, index: usize) -> Option<MediaFile> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

impl WizardForm for PortfolioForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        if self.items.is_empty() {
            vec!["items"]
        } else {
            Vec::new()
        }
    }

    fn build(&self) -> Result<Fragment, FormError> {
        Ok(Fragment::Portfolio(Portfolio {
            items: self.items.clone(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Service selection (occupation provider)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSelectionForm {
    pub trade: String,
    pub selected: Vec<String>,
    pub radius_km: String,
}

impl ServiceSelectionForm {
    /// Select `service`, or deselect it if already selected.
    pub fn toggle(&mut self, service: &str) {
        let service = service.trim();
        if let Some(pos) = self
            .selected
            .iter()
            .position(|s| s.eq_ignore_ascii_case(service))
        {
            self.selected.remove(pos);
        } else if !service.is_empty() {
            self.selected.push(service.to_string());
        }
    }
}

impl WizardForm for ServiceSelectionForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.trade) {
            missing.push("trade");
        }
        if trimmed_list(&self.selected).is_empty() {
            missing.push("services");
        }
        missing
    }

    fn build(&self) -> Result<Fragment, FormError> {
        Ok(Fragment::Services(ServiceSelection {
            trade: self.trade.trim().to_string(),
            services: trimmed_list(&self.selected),
            service_radius_km: optional_number("radius_km", &self.radius_km)?,
        }))
    }
}

// ---------------------------------------------------------------------------
// Influencer profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfluencerProfileForm {
    pub handle: String,
    pub niche: String,
    pub platforms: Vec<String>,
    pub follower_count: String,
}

impl WizardForm for InfluencerProfileForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(self.handle.trim().trim_start_matches('@')) {
            missing.push("handle");
        }
        if blank(&self.niche) {
            missing.push("niche");
        }
        if trimmed_list(&self.platforms).is_empty() {
            missing.push("platforms");
        }
        missing
    }

    fn build(&self) -> Result<Fragment, FormError> {
        let handle = self.handle.trim().trim_start_matches('@');
        Ok(Fragment::Influencer(InfluencerProfile {
            handle: format!("@{handle}"),
            niche: self.niche.trim().to_string(),
            platforms: trimmed_list(&self.platforms),
            follower_count: optional_number("follower_count", &self.follower_count)?,
        }))
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationForm {
    pub country: String,
    pub state: String,
    pub city: String,
}

impl LocationForm {
    /// Picking a new country clears the dependent selections.
    pub fn set_country(&mut self, country: &str) {
        if self.country != country {
            self.country = country.to_string();
            self.state.clear();
            self.city.clear();
        }
    }

    pub fn set_state(&mut self, state: &str) {
        if self.state != state {
            self.state = state.to_string();
            self.city.clear();
        }
    }
}

impl WizardForm for LocationForm {
    type Output = Fragment;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.country) {
            missing.push("country");
        }
        if blank(&self.state) {
            missing.push("state");
        }
        if blank(&self.city) {
            missing.push("city");
        }
        missing
    }

    fn build(&self) -> Result<Fragment, FormError> {
        Ok(Fragment::Location(Location::new(
            self.country.trim(),
            self.state.trim(),
            self.city.trim(),
        )))
    }
}

// ---------------------------------------------------------------------------
// Profile edit
// ---------------------------------------------------------------------------

/// Validated result of [`ProfileEditForm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub niche: String,
    pub country: String,
    pub preferred_scope: Scope,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileEditForm {
    pub name: String,
    pub niche: String,
    pub country: String,
    pub preferred_scope: Scope,
    pub bio: String,
}

impl WizardForm for ProfileEditForm {
    type Output = ProfileUpdate;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.niche) {
            missing.push("niche");
        }
        if blank(&self.country) {
            missing.push("country");
        }
        missing
    }

    fn build(&self) -> Result<ProfileUpdate, FormError> {
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            niche: self.niche.trim().to_string(),
            country: self.country.trim().to_string(),
            preferred_scope: self.preferred_scope,
            bio: optional(&self.bio),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_form_reports_blank_fields() {
        let mut form = BusinessProfileForm {
            name: "  ".into(),
            category: "bakery".into(),
            ..Default::default()
        };
        assert!(!form.is_complete());
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::MissingFields(vec!["name", "description"])
        );

        form.name = "Crumbs".into();
        form.description = "Sourdough".into();
        form.website = "   ".into();
        match form.submit().unwrap() {
            Fragment::Business(b) => {
                assert_eq!(b.name, "Crumbs");
                assert_eq!(b.website, None);
            }
            other => panic!("unexpected fragment {other:?}"),
        }
    }

    #[test]
    fn gig_form_needs_a_skill_and_numeric_rate() {
        let mut form = GigForm {
            title: "Copywriting".into(),
            category: "writing".into(),
            skills: vec!["  ".into()],
            description: "Web copy".into(),
            hourly_rate: String::new(),
        };
        assert_eq!(form.missing_fields(), vec!["skills"]);

        form.skills.push("SEO".into());
        form.hourly_rate = "fifty".into();
        assert!(matches!(
            form.submit(),
            Err(FormError::Invalid { field: "hourly_rate", .. })
        ));

        form.hourly_rate = "50".into();
        match form.submit().unwrap() {
            Fragment::Gig(g) => {
                assert_eq!(g.skills, vec!["SEO"]);
                assert_eq!(g.hourly_rate, Some(50));
            }
            other => panic!("unexpected fragment {other:?}"),
        }
    }

    #[test]
    fn portfolio_needs_one_item() {
        let mut form = PortfolioForm::default();
        assert_eq!(form.missing_fields(), vec!["items"]);

        form.add_bytes("shot.jpg", b"\xff\xd8").unwrap();
        assert!(form.is_complete());
        assert!(form.remove(3).is_none());
        assert!(form.remove(0).is_some());
        assert!(!form.is_complete());
    }

    #[test]
    fn service_toggle_adds_and_removes() {
        let mut form = ServiceSelectionForm {
            trade: "electrician".into(),
            ..Default::default()
        };
        form.toggle("Rewiring");
        form.toggle("EV chargers");
        form.toggle("rewiring");
        assert_eq!(form.selected, vec!["EV chargers"]);
        assert!(form.is_complete());
    }

    #[test]
    fn influencer_handle_is_normalized() {
        let form = InfluencerProfileForm {
            handle: "@@".into(),
            niche: "travel".into(),
            platforms: vec!["youtube".into()],
            follower_count: String::new(),
        };
        assert_eq!(form.missing_fields(), vec!["handle"]);

        let form = InfluencerProfileForm {
            handle: "wanderer".into(),
            ..form
        };
        match form.submit().unwrap() {
            Fragment::Influencer(i) => assert_eq!(i.handle, "@wanderer"),
            other => panic!("unexpected fragment {other:?}"),
        }
    }

    #[test]
    fn location_country_change_resets_children() {
        let mut form = LocationForm::default();
        form.set_country("India");
        form.set_state("Maharashtra");
        form.city = "Pune".into();
        assert!(form.is_complete());

        form.set_country("India");
        assert_eq!(form.city, "Pune");

        form.set_country("Canada");
        assert_eq!(form.missing_fields(), vec!["state", "city"]);
    }

    #[test]
    fn profile_edit_trims_bio() {
        let form = ProfileEditForm {
            name: "Ada".into(),
            niche: "software".into(),
            country: "United Kingdom".into(),
            preferred_scope: Scope::Global,
            bio: "   ".into(),
        };
        let update = form.submit().unwrap();
        assert_eq!(update.bio, None);
        assert_eq!(update.preferred_scope, Scope::Global);
    }
}
