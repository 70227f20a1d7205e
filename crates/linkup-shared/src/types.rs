use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GroupId(pub Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Filter expression selecting this group's rows in the realtime feed.
    pub fn to_filter(&self) -> String {
        format!("group_id=eq.{}", self.0)
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// Who the user is on the network. Decides which wizard branch runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Business,
    Freelancer,
    OccupationProvider,
    SocialMediaInfluencer,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Business,
        Persona::Freelancer,
        Persona::OccupationProvider,
        Persona::SocialMediaInfluencer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Business => "business",
            Persona::Freelancer => "freelancer",
            Persona::OccupationProvider => "occupation_provider",
            Persona::SocialMediaInfluencer => "social_media_influencer",
        }
    }

    /// The directory section a persona browses when it only wants to look.
    pub fn browse_filter(&self) -> BrowseFilter {
        match self {
            Persona::Business => BrowseFilter::Businesses,
            Persona::Freelancer => BrowseFilter::Freelancers,
            Persona::OccupationProvider => BrowseFilter::LocalServices,
            Persona::SocialMediaInfluencer => BrowseFilter::Influencers,
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "business" => Ok(Persona::Business),
            "freelancer" => Ok(Persona::Freelancer),
            "occupation_provider" => Ok(Persona::OccupationProvider),
            "social_media_influencer" => Ok(Persona::SocialMediaInfluencer),
            other => Err(ParseError::Persona(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// UserAction
// ---------------------------------------------------------------------------

/// What the user intends to do after picking a persona.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Create,
    Join,
    View,
}

impl UserAction {
    pub const ALL: [UserAction; 3] = [UserAction::Create, UserAction::Join, UserAction::View];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::Create => "create",
            UserAction::Join => "join",
            UserAction::View => "view",
        }
    }
}

impl std::fmt::Display for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "create" => Ok(UserAction::Create),
            "join" => Ok(UserAction::Join),
            "view" => Ok(UserAction::View),
            other => Err(ParseError::Action(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Network breadth of a group or of a user's preference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Local,
    Regional,
    Global,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Local, Scope::Regional, Scope::Global];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Regional => "regional",
            Scope::Global => "global",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Scope::Local),
            "regional" => Ok(Scope::Regional),
            "global" => Ok(Scope::Global),
            _ => Err(ParseError::Scope(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// BrowseFilter
// ---------------------------------------------------------------------------

/// Section of the directory shown on the browse screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BrowseFilter {
    All,
    Businesses,
    Freelancers,
    LocalServices,
    Influencers,
}

impl BrowseFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowseFilter::All => "all",
            BrowseFilter::Businesses => "businesses",
            BrowseFilter::Freelancers => "freelancers",
            BrowseFilter::LocalServices => "local_services",
            BrowseFilter::Influencers => "influencers",
        }
    }

    pub fn includes(&self, persona: Persona) -> bool {
        match self {
            BrowseFilter::All => true,
            other => persona.browse_filter() == *other,
        }
    }
}

impl std::fmt::Display for BrowseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowseFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(BrowseFilter::All),
            "businesses" => Ok(BrowseFilter::Businesses),
            "freelancers" => Ok(BrowseFilter::Freelancers),
            "local_services" => Ok(BrowseFilter::LocalServices),
            "influencers" => Ok(BrowseFilter::Influencers),
            other => Err(ParseError::BrowseFilter(other.to_string())),
        }
    }
}
