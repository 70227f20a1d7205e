//! Domain records shared by the client core, the store and the server.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed to a
//! UI shell, written to SQLite as JSON columns, or returned over HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, MessageId, Persona, Scope, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The person using the app, with their self-described attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub persona: Option<Persona>,
    /// Topic or category the user works in ("photography", "plumbing", ...).
    pub niche: String,
    pub country: String,
    pub preferred_scope: Scope,
    pub bio: Option<String>,
    /// Avatar image as a `data:` URL.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, niche: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            persona: None,
            niche: niche.into(),
            country: country.into(),
            preferred_scope: Scope::default(),
            bio: None,
            avatar: None,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A topic- or location-based community.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub member_count: u32,
    pub scope: Scope,
    pub niche: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat entry inside a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub group_id: GroupId,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        group_id: GroupId,
        author_id: UserId,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            group_id,
            author_id,
            author_name: author_name.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// One node of the country / state / city hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    pub country: String,
    pub state: String,
    pub city: String,
}

impl Location {
    pub fn new(country: impl Into<String>, state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: state.into(),
            city: city.into(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.state, self.country)
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// A directory card shown on the browse screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: UserId,
    pub name: String,
    pub persona: Persona,
    pub category: String,
    pub city: String,
    pub country: String,
    pub rating: f32,
}

// ---------------------------------------------------------------------------
// Wizard fragments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessProfile {
    pub name: String,
    pub category: String,
    pub description: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GigProfile {
    pub title: String,
    pub category: String,
    pub skills: Vec<String>,
    pub description: String,
    pub hourly_rate: Option<u32>,
}

/// An image or video read from disk, kept inline as a `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    pub data_url: String,
}

impl MediaFile {
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Portfolio {
    pub items: Vec<MediaFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSelection {
    pub trade: String,
    pub services: Vec<String>,
    pub service_radius_km: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfluencerProfile {
    pub handle: String,
    pub niche: String,
    pub platforms: Vec<String>,
    pub follower_count: Option<u64>,
}
