//! Store de sesión clave/valor y registro de usuario.
//!
//! El store sólo conoce strings; `SessionManager` guarda `UserSession`
//! serializado como JSON bajo `SESSION_KEY`.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

pub const SESSION_KEY: &str = "userSession";

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<BTreeMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(lock(&self.inner).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        lock(&self.inner).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        lock(&self.inner).remove(key);
        Ok(())
    }
}

/// Store respaldado por un archivo JSON (objeto plano string -> string).
/// Cada mutación reescribe el mapa completo en un temporal y lo renombra.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    inner: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Abre (o crea al primer `set`) el archivo en `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let map = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("session store opened path={} keys={}", path.display(), map.len());
        Ok(Self { path,
                  inner: Mutex::new(map) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(lock(&self.inner).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut map = lock(&self.inner);
        let previous = map.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&map) {
            // deja el mapa como estaba en disco
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            warn!("session store write failed path={} err={}", self.path.display(), e);
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut map = lock(&self.inner);
        let Some(previous) = map.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist(&map) {
            map.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Pharmacy,
}

impl Role {
    /// Nombre mostrado cuando el login no trae uno.
    pub fn default_name(self) -> &'static str {
        match self {
            Role::Patient => "Patient User",
            Role::Doctor => "Dr. User",
            Role::Pharmacy => "Pharmacy User",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_type: Role,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_method: Option<String>,
}

impl UserSession {
    pub fn new(user_type: Role, email: &str) -> Self {
        Self { user_type,
               email: email.to_string(),
               name: None,
               photo_url: None,
               uid: None,
               login_time: Utc::now(),
               login_method: None }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string()).filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_photo(mut self, url: &str) -> Self {
        self.photo_url = Some(url.to_string());
        self
    }

    pub fn with_uid(mut self, uid: &str) -> Self {
        self.uid = Some(uid.to_string());
        self
    }

    pub fn via(mut self, method: &str) -> Self {
        self.login_method = Some(method.to_string());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.user_type.default_name())
    }
}

pub struct SessionManager<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Guarda la sesión; si no trae nombre se completa con el del rol.
    pub fn login(&self, mut session: UserSession) -> Result<UserSession, SessionError> {
        if session.name.is_none() {
            session.name = Some(session.user_type.default_name().to_string());
        }
        self.store.set(SESSION_KEY, &serde_json::to_string(&session)?)?;
        debug!("login role={:?} email={}", session.user_type, session.email);
        Ok(session)
    }

    pub fn current(&self) -> Result<Option<UserSession>, SessionError> {
        match self.store.get(SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(SESSION_KEY)
    }

    /// Nombre para el saludo; "User" sin sesión.
    pub fn display_name(&self) -> Result<String, SessionError> {
        Ok(self.current()?
               .map(|s| s.display_name().to_string())
               .unwrap_or_else(|| "User".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_shell_field_names() {
        let s = UserSession::new(Role::Patient, "a@b.c").with_photo("http://p").via("google");
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["userType"], "patient");
        assert_eq!(v["photoURL"], "http://p");
        assert_eq!(v["loginMethod"], "google");
        assert!(v.get("loginTime").is_some());
        assert!(v.get("uid").is_none());
    }

    #[test]
    fn reads_minimal_record() {
        let raw = r#"{"userType":"doctor","email":"d@x.y","loginTime":"2024-05-01T10:00:00Z"}"#;
        let s: UserSession = serde_json::from_str(raw).unwrap();
        assert_eq!(s.user_type, Role::Doctor);
        assert_eq!(s.display_name(), "Dr. User");
    }

    #[test]
    fn manager_lifecycle() {
        let mgr = SessionManager::new(InMemorySessionStore::new());
        assert_eq!(mgr.display_name().unwrap(), "User");
        let s = mgr.login(UserSession::new(Role::Pharmacy, "p@x.y")).unwrap();
        assert_eq!(s.name.as_deref(), Some("Pharmacy User"));
        assert_eq!(mgr.current().unwrap(), Some(s));
        mgr.logout().unwrap();
        assert!(mgr.current().unwrap().is_none());
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let store = InMemorySessionStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();
        let mgr = SessionManager::new(store);
        assert!(matches!(mgr.current(), Err(SessionError::Corrupt(_))));
    }
}
