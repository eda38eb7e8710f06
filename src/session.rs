//! Session state shared between the client and its service modules

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{Role, User};

/// Authentication state of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// A token was restored from disk but has not been verified yet
    Unknown,
    /// A token is present and has been verified against the API
    Authenticated,
    /// No token is held
    Unauthenticated,
}

/// On-disk shape of a persisted session
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    user: Option<User>,
}

#[derive(Debug)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
    status: SessionStatus,
}

/// Callback fired when a 401 invalidates the session
pub type InvalidatedHook = Arc<dyn Fn() + Send + Sync>;

/// Holds the bearer token and the authenticated user, and mirrors both to
/// disk when a session file is configured.
///
/// All service modules observe the same store, so a 401 on any request
/// is visible everywhere at once.
pub struct SessionStore {
    state: RwLock<SessionState>,
    file: Option<PathBuf>,
    on_invalidated: RwLock<Option<InvalidatedHook>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().unwrap();
        f.debug_struct("SessionStore")
            .field("status", &state.status)
            .field("has_token", &state.token.is_some())
            .field("file", &self.file)
            .finish()
    }
}

impl SessionStore {
    /// Create a store, restoring any session previously persisted at `file`.
    ///
    /// A restored token starts in [`SessionStatus::Unknown`] until it is
    /// verified with a who-am-I request. Unreadable or corrupt session files
    /// are logged and treated as no session.
    pub fn new(file: Option<PathBuf>) -> Self {
        let state = match &file {
            Some(path) => match Self::load_file(path) {
                Ok(Some(persisted)) => {
                    debug!("restored session from {}", path.display());
                    SessionState {
                        token: Some(persisted.token),
                        user: persisted.user,
                        status: SessionStatus::Unknown,
                    }
                }
                Ok(None) => SessionState {
                    token: None,
                    user: None,
                    status: SessionStatus::Unauthenticated,
                },
                Err(err) => {
                    warn!("ignoring unreadable session file {}: {}", path.display(), err);
                    SessionState {
                        token: None,
                        user: None,
                        status: SessionStatus::Unauthenticated,
                    }
                }
            },
            None => SessionState {
                token: None,
                user: None,
                status: SessionStatus::Unauthenticated,
            },
        };

        Self {
            state: RwLock::new(state),
            file,
            on_invalidated: RwLock::new(None),
        }
    }

    fn load_file(path: &PathBuf) -> Result<Option<PersistedSession>, Error> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Store a freshly issued token and user, and persist them.
    pub fn establish(&self, token: String, user: User) -> Result<(), Error> {
        {
            let mut state = self.state.write().unwrap();
            state.token = Some(token);
            state.user = Some(user);
            state.status = SessionStatus::Authenticated;
        }
        self.persist()
    }

    /// Replace the stored user, keeping the token. Used after profile
    /// updates and after a who-am-I verification.
    pub fn update_user(&self, user: User) -> Result<(), Error> {
        {
            let mut state = self.state.write().unwrap();
            state.user = Some(user);
            state.status = SessionStatus::Authenticated;
        }
        self.persist()
    }

    /// Drop the session locally and remove the persisted file. Idempotent.
    pub fn clear(&self) -> Result<(), Error> {
        {
            let mut state = self.state.write().unwrap();
            state.token = None;
            state.user = None;
            state.status = SessionStatus::Unauthenticated;
        }
        if let Some(path) = &self.file {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Invalidate the session after a 401 and fire the unauthorized hook.
    ///
    /// The hook fires only when a session was actually held, so concurrent
    /// 401 responses report a single logout. It runs outside the state
    /// lock and may call back into the store freely.
    pub(crate) fn invalidate(&self) {
        let had_session = {
            let mut state = self.state.write().unwrap();
            let had = state.token.is_some();
            state.token = None;
            state.user = None;
            state.status = SessionStatus::Unauthenticated;
            had
        };
        if let Some(path) = &self.file {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => warn!("failed to remove persisted session: {}", err),
            }
        }
        if had_session {
            let hook = self.on_invalidated.read().unwrap().clone();
            if let Some(hook) = hook {
                hook();
            }
        }
    }

    /// Register the hook fired when a 401 invalidates the session
    pub fn set_on_invalidated(&self, hook: InvalidatedHook) {
        *self.on_invalidated.write().unwrap() = Some(hook);
    }

    fn persist(&self) -> Result<(), Error> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let persisted = {
            let state = self.state.read().unwrap();
            match &state.token {
                Some(token) => PersistedSession {
                    token: token.clone(),
                    user: state.user.clone(),
                },
                None => return Ok(()),
            }
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string(&persisted)?;
        fs::write(path, contents)?;
        debug!("persisted session to {}", path.display());
        Ok(())
    }

    /// The current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    /// The current user, if any
    pub fn user(&self) -> Option<User> {
        self.state.read().unwrap().user.clone()
    }

    /// The current authentication status
    pub fn status(&self) -> SessionStatus {
        self.state.read().unwrap().status
    }

    /// True when a token is held, verified or not
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().token.is_some()
    }

    /// True when the current user has the admin role
    pub fn is_admin(&self) -> bool {
        self.state
            .read()
            .unwrap()
            .user
            .as_ref()
            .map(|user| user.role == Role::Admin)
            .unwrap_or(false)
    }

    /// True when the current user has the establishment role
    pub fn is_establishment(&self) -> bool {
        self.state
            .read()
            .unwrap()
            .user
            .as_ref()
            .map(|user| user.role == Role::Establishment)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_user(role: Role) -> User {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "username": "joana",
            "email": "joana@example.com",
            "role": match role {
                Role::Admin => "admin",
                Role::Establishment => "establishment",
                Role::User => "user",
            },
        }))
        .unwrap()
    }

    #[test]
    fn starts_unauthenticated_without_a_file() {
        let store = SessionStore::new(None);
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn establish_then_clear_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::new(Some(path.clone()));
        store
            .establish("tok-123".to_string(), sample_user(Role::User))
            .unwrap();
        assert!(path.exists());

        let restored = SessionStore::new(Some(path.clone()));
        assert_eq!(restored.token().as_deref(), Some("tok-123"));
        assert_eq!(restored.status(), SessionStatus::Unknown);

        restored.clear().unwrap();
        assert!(!path.exists());
        // clearing twice is fine
        restored.clear().unwrap();
    }

    #[test]
    fn corrupt_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::new(Some(path));
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
    }

    #[test]
    fn role_helpers_follow_the_stored_user() {
        let store = SessionStore::new(None);
        assert!(!store.is_admin());

        store
            .establish("tok".to_string(), sample_user(Role::Admin))
            .unwrap();
        assert!(store.is_admin());
        assert!(!store.is_establishment());

        store
            .update_user(sample_user(Role::Establishment))
            .unwrap();
        assert!(store.is_establishment());
        assert!(!store.is_admin());
    }

    #[test]
    fn invalidate_fires_the_hook_once_per_session() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);

        let store = SessionStore::new(None);
        store.set_on_invalidated(Arc::new(|| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        }));
        store
            .establish("tok".to_string(), sample_user(Role::User))
            .unwrap();

        store.invalidate();
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
        assert!(!store.is_authenticated());

        // a second 401 on the already-cleared store stays silent
        store.invalidate();
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }
}
