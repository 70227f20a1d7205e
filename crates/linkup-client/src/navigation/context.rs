use serde::{Deserialize, Serialize};

use linkup_shared::models::{
    BusinessProfile, GigProfile, InfluencerProfile, Location, Portfolio, ServiceSelection,
};
use linkup_shared::types::{Persona, UserAction};

/// The piece of profile data one wizard screen produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Fragment {
    Business(BusinessProfile),
    Niche(String),
    Gig(GigProfile),
    Portfolio(Portfolio),
    Services(ServiceSelection),
    Influencer(InfluencerProfile),
    Location(Location),
}

impl Fragment {
    pub fn name(&self) -> &'static str {
        match self {
            Fragment::Business(_) => "business",
            Fragment::Niche(_) => "niche",
            Fragment::Gig(_) => "gig",
            Fragment::Portfolio(_) => "portfolio",
            Fragment::Services(_) => "services",
            Fragment::Influencer(_) => "influencer",
            Fragment::Location(_) => "location",
        }
    }
}

/// Everything the wizard has collected so far.
///
/// Never mutated in place: each stage hands back a new context via
/// [`WizardContext::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardContext {
    pub persona: Option<Persona>,
    pub action: Option<UserAction>,
    pub business: Option<BusinessProfile>,
    pub niche: Option<String>,
    pub gig: Option<GigProfile>,
    pub portfolio: Option<Portfolio>,
    pub services: Option<ServiceSelection>,
    pub influencer: Option<InfluencerProfile>,
    pub location: Option<Location>,
}

impl WizardContext {
    /// A fresh context for a newly chosen persona and action.
    pub fn start(persona: Persona, action: UserAction) -> Self {
        Self {
            persona: Some(persona),
            action: Some(action),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn merge(self, fragment: Fragment) -> Self {
        match fragment {
            Fragment::Business(b) => Self {
                business: Some(b),
                ..self
            },
            Fragment::Niche(n) => Self {
                niche: Some(n),
                ..self
            },
            Fragment::Gig(g) => Self {
                gig: Some(g),
                ..self
            },
            Fragment::Portfolio(p) => Self {
                portfolio: Some(p),
                ..self
            },
            Fragment::Services(s) => Self {
                services: Some(s),
                ..self
            },
            Fragment::Influencer(i) => Self {
                influencer: Some(i),
                ..self
            },
            Fragment::Location(l) => Self {
                location: Some(l),
                ..self
            },
        }
    }

    /// The niche the user works in, from whichever fragment carries one.
    pub fn effective_niche(&self) -> Option<String> {
        self.niche
            .clone()
            .or_else(|| self.business.as_ref().map(|b| b.category.clone()))
            .or_else(|| self.gig.as_ref().map(|g| g.category.clone()))
            .or_else(|| self.services.as_ref().map(|s| s.trade.clone()))
            .or_else(|| self.influencer.as_ref().map(|i| i.niche.clone()))
            .filter(|n| !n.trim().is_empty())
    }

    /// A display name derived from the collected profile, if any.
    pub fn display_name(&self) -> Option<String> {
        self.business
            .as_ref()
            .map(|b| b.name.clone())
            .or_else(|| self.influencer.as_ref().map(|i| i.handle.clone()))
            .or_else(|| self.gig.as_ref().map(|g| g.title.clone()))
            .filter(|n| !n.trim().is_empty())
    }
}
