use parking_lot::Mutex;
use tracing::info;

/// Aviso mostrado al usuario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Bloqueante (el `alert()` del navegador).
    Alert(String),
    /// No bloqueante; no interrumpe al usuario.
    Toast(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Alert(t) | Notice::Toast(t) => t,
        }
    }
}

#[derive(Debug, Default)]
struct ShellState {
    notices: Vec<Notice>,
    location: Option<String>,
    history: Vec<String>,
}

/// Entorno del navegador compartido por las páginas: avisos y navegación.
#[derive(Debug, Default)]
pub struct Shell {
    state: Mutex<ShellState>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert(&self, text: impl Into<String>) {
        let text = text.into();
        info!("alert: {text}");
        self.state.lock().notices.push(Notice::Alert(text));
    }

    pub fn toast(&self, text: impl Into<String>) {
        let text = text.into();
        info!("notice: {text}");
        self.state.lock().notices.push(Notice::Toast(text));
    }

    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        info!("navigating to {path}");
        let mut state = self.state.lock();
        state.history.push(path.clone());
        state.location = Some(path);
    }

    pub fn location(&self) -> Option<String> {
        self.state.lock().location.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state.lock().notices.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state
            .lock()
            .notices
            .iter()
            .filter_map(|n| match n {
                Notice::Alert(t) => Some(t.clone()),
                Notice::Toast(_) => None,
            })
            .collect()
    }

    /// Vacía y devuelve los avisos pendientes (el CLI los imprime).
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_and_toasts_kept_in_order() {
        let shell = Shell::new();
        shell.alert("Select a teacher");
        shell.toast("Failed to load subjects");
        shell.alert("Saved");

        assert_eq!(shell.alerts(), vec!["Select a teacher", "Saved"]);
        let drained = shell.drain_notices();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[1], Notice::Toast("Failed to load subjects".into()));
        assert!(shell.notices().is_empty());
    }

    #[test]
    fn test_navigation_history() {
        let shell = Shell::new();
        shell.navigate("/");
        shell.navigate("/hod/dashboard");
        assert_eq!(shell.location().as_deref(), Some("/hod/dashboard"));
        assert_eq!(shell.history().len(), 2);
    }
}
