use std::path::Path;

use tracing::info;

use linkup_shared::models::User;

use crate::error::{ClientError, MediaError};
use crate::events::SessionEvent;
use crate::forms::{ProfileEditForm, WizardForm};
use crate::media;
use crate::state::{user_from_context, Session};

impl Session {
    /// The current user, built from the wizard data on first use.
    pub fn current_user(&mut self) -> Result<&User, ClientError> {
        if self.user.is_none() {
            let user = user_from_context(self.navigator.context())?;
            self.persist_user(&user)?;
            info!(user = %user.id, name = %user.name, "User created from wizard data");
            self.user = Some(user);
        }
        self.user.as_ref().ok_or(ClientError::MissingContext("user"))
    }

    /// Apply a validated profile edit.
    pub fn update_profile(&mut self, form: &ProfileEditForm) -> Result<&User, ClientError> {
        let update = form.submit()?;

        let mut user = self.current_user()?.clone();
        user.name = update.name;
        user.niche = update.niche;
        user.country = update.country;
        user.preferred_scope = update.preferred_scope;
        user.bio = update.bio;

        self.persist_user(&user)?;
        info!(user = %user.id, "Profile updated");
        self.emit(SessionEvent::ProfileUpdated(user.clone()));
        Ok(&*self.user.insert(user))
    }

    /// Use an image file as the avatar. Videos are rejected.
    pub fn set_avatar_from_file(&mut self, path: &Path) -> Result<&User, ClientError> {
        let file = media::read_media_file(path)?;
        if file.is_video() {
            return Err(MediaError::UnsupportedType(file.file_name).into());
        }

        let mut user = self.current_user()?.clone();
        user.avatar = Some(file.data_url);

        self.persist_user(&user)?;
        info!(user = %user.id, file = %file.file_name, "Avatar updated");
        self.emit(SessionEvent::ProfileUpdated(user.clone()));
        Ok(&*self.user.insert(user))
    }

    /// Shareable link to the current user's profile.
    pub fn profile_link(&mut self) -> Result<String, ClientError> {
        let base = self.config.profile_base_url.trim_end_matches('/').to_string();
        let user = self.current_user()?;
        Ok(format!("{base}/u/{}", user.id))
    }

    /// Make `user` the session's user: the registration step after a
    /// preview is confirmed.
    pub(crate) fn register(&mut self, user: User) -> Result<(), ClientError> {
        self.persist_user(&user)?;
        info!(user = %user.id, name = %user.name, persona = ?user.persona, "User registered");

        // Groups and rooms generated for an earlier user are stale.
        if self.user.as_ref().map(|u| u.id) != Some(user.id) {
            self.forget_user();
        }
        self.emit(SessionEvent::ProfileUpdated(user.clone()));
        self.user = Some(user);
        self.registered = true;
        Ok(())
    }

    fn persist_user(&self, user: &User) -> Result<(), ClientError> {
        if let Some(db) = &self.database {
            db.upsert_user(user)?;
        }
        Ok(())
    }
}
