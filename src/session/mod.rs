//! Session management
//!
//! Sessions live in the master database and carry one [`SessionProfile`]
//! under [`PROFILE_KEY`]. The cookie is private (encrypted) and its key is
//! derived from the configured sessions password.

pub mod cleanup;
pub mod store;

pub use cleanup::{spawn_cleanup, CleanupTask};
pub use store::MySqlSessionStore;

use crate::config::SessionConfig;
use crate::crypto::derive_cookie_key_material;
use crate::domain::{SessionProfile, PROFILE_KEY};
use crate::error::Result;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::PrivateCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

pub const SESSION_COOKIE_NAME: &str = "tenancy.sid";

/// Session layer with a private cookie keyed from the sessions password
pub fn session_layer<St>(
    store: St,
    config: &SessionConfig,
    secure: bool,
) -> SessionManagerLayer<St, PrivateCookie>
where
    St: SessionStore + Clone,
{
    let key = Key::from(&derive_cookie_key_material(&config.password)[..]);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(secure)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            config.ttl_secs,
        )))
        .with_private(key)
}

/// Profile stored in the current session, if any
pub async fn current_profile(session: &Session) -> Result<Option<SessionProfile>> {
    Ok(session.get::<SessionProfile>(PROFILE_KEY).await?)
}

/// Replace the session contents with `profile`, rotating the session id
pub async fn start(session: &Session, profile: &SessionProfile) -> Result<()> {
    session.cycle_id().await?;
    session.insert(PROFILE_KEY, profile).await?;
    Ok(())
}

/// Drop the session and its stored record
pub async fn end(session: &Session) -> Result<()> {
    session.flush().await?;
    Ok(())
}
