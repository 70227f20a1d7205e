use serde::{Deserialize, Serialize};

use linkup_shared::models::{
    BusinessProfile, GigProfile, InfluencerProfile, Location, Portfolio, ServiceSelection,
};
use linkup_shared::types::{BrowseFilter, GroupId, Persona};

/// The screen currently shown. Screens that render upstream wizard data
/// carry it, so they cannot be entered without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum Step {
    PersonaSelection,
    BusinessProfile,
    BusinessNiche,
    FreelancerGig,
    Portfolio,
    ServiceSelection,
    InfluencerProfile,
    InfluencerNiche,
    Location,
    BusinessPreview {
        business: BusinessProfile,
        location: Location,
    },
    FreelancerPreview {
        gig: GigProfile,
        portfolio: Portfolio,
        location: Location,
    },
    ServicePreview {
        services: ServiceSelection,
        location: Location,
    },
    InfluencerPreview {
        influencer: InfluencerProfile,
        location: Location,
    },
    GroupList {
        persona: Persona,
        niche: Option<String>,
        location: Location,
    },
    Browse {
        filter: BrowseFilter,
    },
    Chat {
        group_id: GroupId,
        return_to: Box<Step>,
    },
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::PersonaSelection => StepKind::PersonaSelection,
            Step::BusinessProfile => StepKind::BusinessProfile,
            Step::BusinessNiche => StepKind::BusinessNiche,
            Step::FreelancerGig => StepKind::FreelancerGig,
            Step::Portfolio => StepKind::Portfolio,
            Step::ServiceSelection => StepKind::ServiceSelection,
            Step::InfluencerProfile => StepKind::InfluencerProfile,
            Step::InfluencerNiche => StepKind::InfluencerNiche,
            Step::Location => StepKind::Location,
            Step::BusinessPreview { .. } => StepKind::BusinessPreview,
            Step::FreelancerPreview { .. } => StepKind::FreelancerPreview,
            Step::ServicePreview { .. } => StepKind::ServicePreview,
            Step::InfluencerPreview { .. } => StepKind::InfluencerPreview,
            Step::GroupList { .. } => StepKind::GroupList,
            Step::Browse { .. } => StepKind::Browse,
            Step::Chat { .. } => StepKind::Chat,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Data-free tag of a [`Step`], used in errors, events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    PersonaSelection,
    BusinessProfile,
    BusinessNiche,
    FreelancerGig,
    Portfolio,
    ServiceSelection,
    InfluencerProfile,
    InfluencerNiche,
    Location,
    BusinessPreview,
    FreelancerPreview,
    ServicePreview,
    InfluencerPreview,
    GroupList,
    Browse,
    Chat,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::PersonaSelection => "persona-selection",
            StepKind::BusinessProfile => "business-profile",
            StepKind::BusinessNiche => "business-niche",
            StepKind::FreelancerGig => "freelancer-gig",
            StepKind::Portfolio => "portfolio",
            StepKind::ServiceSelection => "service-selection",
            StepKind::InfluencerProfile => "influencer-profile",
            StepKind::InfluencerNiche => "influencer-niche",
            StepKind::Location => "location",
            StepKind::BusinessPreview => "business-preview",
            StepKind::FreelancerPreview => "freelancer-preview",
            StepKind::ServicePreview => "service-preview",
            StepKind::InfluencerPreview => "influencer-preview",
            StepKind::GroupList => "group-list",
            StepKind::Browse => "browse",
            StepKind::Chat => "chat",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
