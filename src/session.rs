//! Contexto de sesión explícito.
//!
//! La sesión es sólo un identificador guardado bajo la clave fija
//! `faculty_id`; su ausencia es la única señal de "no autenticado". No hay
//! token ni expiración. Cada página recibe un [`Session`] al inicializarse y
//! pasa por [`Session::guard`] antes de emitir cualquier petición.

use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::ui::Shell;

pub const SESSION_KEY: &str = "faculty_id";
pub const SESSION_FILE: &str = "session.json";
pub const LOGIN_PATH: &str = "/";
pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "faculty_id")]
    pub user_id: String,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionRecord>, ClientError>;
    fn save(&self, record: &SessionRecord) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Guarda la sesión como JSON en `<data_dir>/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self { path: data_dir.as_ref().join(SESSION_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<SessionRecord>(&contents) {
            Ok(r) if !r.user_id.trim().is_empty() => Ok(Some(r)),
            Ok(_) => Ok(None),
            Err(e) => {
                // un archivo corrupto cuenta como sesión cerrada
                warn!("ignoring unreadable session file {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    fn save(&self, record: &SessionRecord) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                create_dir_all(dir)?;
            }
        }
        let text = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<SessionRecord>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, ClientError> {
        Ok(self.record.lock().clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<(), ClientError> {
        *self.record.lock() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.record.lock() = None;
        Ok(())
    }
}

/// Sesión del navegador: lectura, inicio (login) y cierre (logout).
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session(..)")
    }
}

impl Session {
    pub fn new<S: SessionStore + 'static>(store: S) -> Self {
        Self { store: Arc::new(store) }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::default())
    }

    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::new(FileSessionStore::in_dir(data_dir))
    }

    /// Identificador guardado, si existe. Un error de lectura cuenta como
    /// ausencia.
    pub fn user_id(&self) -> Option<String> {
        self.record().map(|r| r.user_id)
    }

    pub fn record(&self) -> Option<SessionRecord> {
        match self.store.load() {
            Ok(r) => r,
            Err(e) => {
                warn!("session store read failed: {e}");
                None
            }
        }
    }

    pub fn begin(&self, user_id: &str) -> Result<(), ClientError> {
        let record = SessionRecord {
            user_id: user_id.to_string(),
            logged_in_at: Some(Utc::now()),
        };
        self.store.save(&record)?;
        info!("session started for user {user_id}");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        info!("session cleared");
        Ok(())
    }

    /// Guardia de sesión: sin identificador se avisa al usuario, se navega al
    /// login y se devuelve `Unauthenticated` para abortar la inicialización.
    pub fn guard(&self, shell: &Shell) -> Result<Authenticated, ClientError> {
        match self.user_id() {
            Some(user_id) => Ok(Authenticated { user_id }),
            None => {
                warn!("no session found, redirecting to login");
                shell.alert(SESSION_EXPIRED);
                shell.navigate(LOGIN_PATH);
                Err(ClientError::Unauthenticated)
            }
        }
    }
}

/// Prueba de que la guardia pasó; las páginas con rol la guardan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    user_id: String,
}

impl Authenticated {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_without_session_redirects() {
        let shell = Shell::new();
        let session = Session::in_memory();

        let res = session.guard(&shell);
        assert!(matches!(res, Err(ClientError::Unauthenticated)));
        assert_eq!(shell.alerts(), vec![SESSION_EXPIRED.to_string()]);
        assert_eq!(shell.location().as_deref(), Some(LOGIN_PATH));
    }

    #[test]
    fn test_guard_with_session_has_no_side_effects() {
        let shell = Shell::new();
        let session = Session::in_memory();
        session.begin("42").unwrap();

        let auth = session.guard(&shell).unwrap();
        assert_eq!(auth.user_id(), "42");
        assert!(shell.notices().is_empty());
        assert!(shell.location().is_none());
    }

    #[test]
    fn test_file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::in_dir(dir.path());
        assert!(session.user_id().is_none());

        session.begin("7").unwrap();
        let raw = fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v[SESSION_KEY], "7");

        // otro handle sobre el mismo directorio ve la misma sesión
        assert_eq!(Session::in_dir(dir.path()).user_id().as_deref(), Some("7"));

        session.clear().unwrap();
        assert!(session.user_id().is_none());
        session.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_counts_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert!(Session::in_dir(dir.path()).user_id().is_none());
    }
}
