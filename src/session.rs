//! Locally persisted login state: the signed-in user and the backend session cookies.

use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Partial user profile update.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none() && self.image.is_none()
    }

    fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(username) = &self.username {
            user.username = Some(username.clone());
        }
        if let Some(image) = &self.image {
            user.image = Some(image.clone());
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Cookie name → value, as last set by the backend.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cookies: BTreeMap<String, String>,
}

impl Session {
    /// Apply a `Set-Cookie` header value. Returns whether anything changed.
    fn set_cookie(&mut self, header: &str) -> bool {
        let mut attributes = header.split(';');
        let Some((name, value)) = attributes.next().and_then(|pair| pair.split_once('=')) else {
            return false;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            return false;
        }
        let is_expired = attributes.filter_map(|attribute| attribute.split_once('=')).any(
            |(key, value)| {
                key.trim().eq_ignore_ascii_case("max-age")
                    && value.trim().parse::<i64>().is_ok_and(|max_age| max_age <= 0)
            },
        );
        if is_expired || value.is_empty() {
            self.cookies.remove(name).is_some()
        } else {
            self.cookies.insert(name.to_string(), value.to_string()).as_deref() != Some(value)
        }
    }
}

/// Storage backend for the [`Session`].
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;

    fn save(&self, session: &Session) -> Result;

    fn clear(&self) -> Result;
}

/// Keeps the session in a TOML file.
pub struct FileStore(PathBuf);

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl SessionStore for FileStore {
    #[instrument(skip_all, fields(path = %self.0.display()))]
    fn load(&self) -> Result<Option<Session>> {
        if !self.0.is_file() {
            return Ok(None);
        }
        let session = toml::from_str(&fs::read_to_string(&self.0)?)
            .with_context(|| format!("failed to parse the session file `{}`", self.0.display()))?;
        Ok(Some(session))
    }

    #[instrument(skip_all, fields(path = %self.0.display()))]
    fn save(&self, session: &Session) -> Result {
        fs::write(&self.0, toml::to_string(session)?)
            .with_context(|| format!("failed to write the session file `{}`", self.0.display()))
    }

    #[instrument(skip_all, fields(path = %self.0.display()))]
    fn clear(&self) -> Result {
        if self.0.is_file() {
            fs::remove_file(&self.0).with_context(|| {
                format!("failed to remove the session file `{}`", self.0.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore(Mutex<Option<Session>>);

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save(&self, session: &Session) -> Result {
        *self.0.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}

/// Owns the in-memory session and writes every change through to the store.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    state: Mutex<Session>,
}

impl SessionManager {
    pub fn init(store: impl SessionStore + 'static) -> Result<Self> {
        let session = store.load()?.unwrap_or_default();
        debug!(is_signed_in = session.user.is_some(), "loaded the session");
        Ok(Self { store: Box::new(store), state: Mutex::new(session) })
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn set_user(&self, user: User) -> Result {
        let mut session = self.lock();
        session.user = Some(user);
        self.store.save(&session)
    }

    /// Merge the patch into the signed-in user.
    pub fn update_user(&self, patch: &UserPatch) -> Result<User> {
        let mut session = self.lock();
        let user = session.user.as_mut().context("not signed in")?;
        patch.apply_to(user);
        let user = user.clone();
        self.store.save(&session)?;
        Ok(user)
    }

    /// Forget the user and the cookies.
    pub fn clear(&self) -> Result {
        *self.lock() = Session::default();
        self.store.clear()
    }

    /// `Cookie` header value for the next request.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        let session = self.lock();
        if session.cookies.is_empty() {
            return None;
        }
        Some(session.cookies.iter().map(|(name, value)| format!("{name}={value}")).join("; "))
    }

    /// Remember the cookies from `Set-Cookie` response headers.
    pub fn absorb_set_cookies<'a>(&self, headers: impl IntoIterator<Item = &'a str>) -> Result {
        let mut session = self.lock();
        let mut is_changed = false;
        for header in headers {
            is_changed |= session.set_cookie(header);
        }
        if is_changed {
            debug!(n_cookies = session.cookies.len(), "updated the session cookies");
            self.store.save(&session)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
