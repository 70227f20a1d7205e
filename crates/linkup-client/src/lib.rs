//! Headless core of the Linkup app.
//!
//! A UI shell creates a [`Session`], renders whatever [`Step`] it reports,
//! and calls the session's commands in response to input. State changes are
//! broadcast as [`SessionEvent`]s.

pub mod catalog;
pub mod chat;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod media;
pub mod navigation;
pub mod realtime;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use commands::GroupCard;
pub use config::{ClientConfig, StoreLocation};
pub use error::{ChatError, ClientError, FormError, MediaError, NavError};
pub use events::SessionEvent;
pub use navigation::{Fragment, NavEvent, Navigator, Step, StepKind, WizardContext};
pub use realtime::{spawn_group_listener, ListenerHandle};
pub use state::Session;

/// Install a `tracing` subscriber for shells that do not bring their own.
/// Honours `RUST_LOG`. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("linkup_client=debug,linkup_store=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
