use std::sync::Arc;

use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::api_json::LoginRequest;
use crate::backend::Backend;
use crate::error::{ClientError, ErrorKind};
use crate::session::Session;
use crate::ui::Shell;

pub const UNREACHABLE: &str = "Unable to reach the server";

#[derive(Debug, Clone, Default)]
struct Credentials {
    email: String,
    password: String,
    role: String,
}

/// Página de login. Es la única sin guardia de sesión.
pub struct LoginPage<B> {
    backend: Arc<B>,
    session: Session,
    shell: Arc<Shell>,
    form: Mutex<Credentials>,
    error: Mutex<Option<String>>,
}

impl<B: Backend> LoginPage<B> {
    pub fn new(backend: Arc<B>, session: Session, shell: Arc<Shell>) -> Self {
        Self {
            backend,
            session,
            shell,
            form: Mutex::new(Credentials::default()),
            error: Mutex::new(None),
        }
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.form.lock().email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        self.form.lock().password = password.into();
    }

    pub fn set_role(&self, role: impl Into<String>) {
        self.form.lock().role = role.into();
    }

    /// Texto de la región de error.
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    /// Envía las credenciales tal cual (sin validar el formato). Con éxito se
    /// guarda el id en la sesión y se navega a `redirect`; devuelve la ruta.
    pub async fn login(&self) -> Result<String, ClientError> {
        let req = {
            let form = self.form.lock();
            LoginRequest {
                email: form.email.clone(),
                password: form.password.clone(),
                role: form.role.clone(),
            }
        };

        match self.backend.login(&req).await {
            Ok(resp) => {
                self.session.begin(&resp.user_id)?;
                *self.error.lock() = None;
                info!("login ok as {}, redirecting to {}", req.role, resp.redirect);
                self.shell.navigate(resp.redirect.clone());
                Ok(resp.redirect)
            }
            Err(e) => {
                warn!("login failed: {e}");
                let text = match (e.kind(), e.server_message()) {
                    (ErrorKind::Server, Some(msg)) => msg.to_string(),
                    (ErrorKind::Server, None) => "Login failed".to_string(),
                    _ => UNREACHABLE.to_string(),
                };
                *self.error.lock() = Some(text);
                Err(e)
            }
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            p id="error" style="color: red" {
                @if let Some(text) = self.error() { (text) }
            }
        }
    }
}
