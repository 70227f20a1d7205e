//! Session state shared by every command.
//!
//! A [`Session`] is owned by one UI shell and mutated through `&mut self`.
//! The realtime listener is the only other party; it shares the session as
//! `Arc<Mutex<Session>>`.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;
use tracing::{debug, info};

use linkup_shared::models::{Group, Listing, User};
use linkup_shared::types::GroupId;
use linkup_store::Database;

use crate::catalog;
use crate::chat::ChatRoom;
use crate::config::{ClientConfig, StoreLocation};
use crate::error::ClientError;
use crate::events::{emit_event, SessionEvent, EVENT_BUFFER};
use crate::navigation::{Navigator, WizardContext};

/// Fallbacks for a user built from an incomplete wizard.
const GUEST_NAME: &str = "Guest";
const GENERAL_NICHE: &str = "general";

pub struct Session {
    pub config: ClientConfig,

    /// Local store. `None` keeps the whole session in memory.
    pub database: Option<Database>,

    pub(crate) navigator: Navigator,

    /// Registered or lazily created user. Cleared by a restart or a new
    /// persona selection.
    pub(crate) user: Option<User>,

    /// Whether `user` came from a confirmed preview. A lazily created user
    /// is rebuilt whenever the wizard context changes.
    pub(crate) registered: bool,

    /// Groups generated for the current user, created on first use.
    pub(crate) catalog: Vec<Group>,

    /// Groups joined this session, in join order.
    pub(crate) joined: Vec<Group>,

    pub(crate) chats: HashMap<GroupId, ChatRoom>,

    pub(crate) listings: Vec<Listing>,

    pub(crate) rng: StdRng,

    events_tx: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Start a session, opening the store the config points at.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let database = match &config.store {
            StoreLocation::None => None,
            StoreLocation::PlatformDefault => Some(Database::new()?),
            StoreLocation::Path(path) => Some(Database::open_at(path)?),
        };
        Ok(Self::with_database(config, database))
    }

    /// Start a session over an already opened store (or none).
    pub fn with_database(config: ClientConfig, database: Option<Database>) -> Self {
        let rng = match config.catalog_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        info!(store = database.is_some(), "Session started");

        Self {
            config,
            database,
            navigator: Navigator::new(),
            user: None,
            registered: false,
            catalog: Vec::new(),
            joined: Vec::new(),
            chats: HashMap::new(),
            listings: catalog::mock_listings(),
            rng,
            events_tx,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        emit_event(&self.events_tx, event);
    }

    pub(crate) fn store(&self) -> Result<&Database, ClientError> {
        self.database.as_ref().ok_or(ClientError::NoStore)
    }

    /// Drop everything tied to the current user and go back to persona
    /// selection. The store and config survive.
    pub(crate) fn reset(&mut self) {
        self.navigator.restart();
        self.forget_user();
    }

    /// Drop the user and every group or room generated for them.
    pub(crate) fn forget_user(&mut self) {
        if let Some(user) = self.user.take() {
            debug!(user = %user.id, registered = self.registered, "Forgetting session user");
        }
        self.registered = false;
        self.catalog.clear();
        self.joined.clear();
        self.chats.clear();
    }

    /// Called after the wizard context changed: an unregistered user built
    /// from the old context no longer describes it.
    pub(crate) fn context_changed(&mut self) {
        if !self.registered && self.user.is_some() {
            self.forget_user();
        }
    }

    /// A group the session knows about, from the catalog or the joined list.
    pub(crate) fn find_group(&self, id: GroupId) -> Option<&Group> {
        self.catalog
            .iter()
            .chain(self.joined.iter())
            .find(|g| g.id == id)
    }

    /// Generate the catalog for the current user if it does not exist yet.
    pub(crate) fn ensure_catalog(&mut self) -> Result<(), ClientError> {
        if self.catalog.is_empty() {
            let user = self.current_user()?.clone();
            self.catalog = catalog::generate_groups(&user, &mut self.rng);
            info!(user = %user.id, groups = self.catalog.len(), "Catalog generated");
        }
        Ok(())
    }
}

/// Build a user from what the wizard collected.
pub(crate) fn user_from_context(ctx: &WizardContext) -> Result<User, ClientError> {
    let persona = ctx.persona.ok_or(ClientError::MissingContext("persona"))?;

    let name = ctx.display_name().unwrap_or_else(|| GUEST_NAME.to_string());
    let niche = ctx
        .effective_niche()
        .unwrap_or_else(|| GENERAL_NICHE.to_string());
    let country = ctx
        .location
        .as_ref()
        .map(|l| l.country.clone())
        .unwrap_or_default();

    let mut user = User::new(name, niche, country);
    user.persona = Some(persona);
    if let Some(business) = &ctx.business {
        user.bio = Some(business.description.clone());
    } else if let Some(gig) = &ctx.gig {
        user.bio = Some(gig.description.clone());
    }
    Ok(user)
}
