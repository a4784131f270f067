//! Cargador de selectores en cascada.
//!
//! Dada la clave del padre (año, año+semestre, ...) pide el conjunto de
//! opciones dependiente y rellena uno o más selectores destino. Si la clave
//! está incompleta no se emite petición y los destinos vuelven al placeholder.

use std::future::Future;

use tracing::{debug, warn};

use super::latest::Latest;
use super::select::{AsOption, OptionItem, SelectControl};
use super::shell::Shell;
use crate::error::ClientError;

pub type DependentSelect = Latest<SelectControl>;

impl DependentSelect {
    pub fn placeholder(label: impl Into<String>) -> Self {
        Latest::new(SelectControl::new(label))
    }

    /// Vuelve al placeholder descartando peticiones en vuelo.
    pub fn reset(&self) {
        self.invalidate(SelectControl::reset);
    }

    pub fn select(&self, value: &str) -> Result<(), ClientError> {
        self.update(|c| c.select(value))
    }

    pub fn value(&self) -> Option<String> {
        self.read(|c| c.value().map(str::to_string))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Clave del padre incompleta: no hubo petición.
    Skipped,
    /// Al menos un destino recibió las opciones.
    Applied { items: usize },
    /// Llegó tarde: otra petición más nueva ya se emitió para todos los destinos.
    Stale,
    /// La petición falló; los destinos quedan en estado de error.
    Failed,
}

pub struct Cascade<'a> {
    shell: &'a Shell,
    targets: Vec<&'a DependentSelect>,
    failure_notice: &'a str,
    empty_label: Option<&'a str>,
}

impl<'a> Cascade<'a> {
    pub fn new(shell: &'a Shell, targets: &[&'a DependentSelect]) -> Self {
        Self {
            shell,
            targets: targets.to_vec(),
            failure_notice: "Failed to load options",
            empty_label: None,
        }
    }

    pub fn on_failure(mut self, notice: &'a str) -> Self {
        self.failure_notice = notice;
        self
    }

    pub fn when_empty(mut self, label: &'a str) -> Self {
        self.empty_label = Some(label);
        self
    }

    /// `loadDependentOptions(parentKey, targets)`.
    pub async fn load<K, T, F, Fut>(self, key: Option<K>, fetch: F) -> LoadOutcome
    where
        T: AsOption,
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<Vec<T>, ClientError>>,
    {
        let Some(key) = key else {
            for t in &self.targets {
                t.reset();
            }
            debug!("parent selection incomplete, dependents reset");
            return LoadOutcome::Skipped;
        };

        let tickets: Vec<_> = self.targets.iter().map(|t| t.issue(SelectControl::set_loading)).collect();

        match fetch(key).await {
            Ok(rows) => {
                let options: Vec<OptionItem> = rows.iter().map(AsOption::as_option).collect();
                let count = options.len();
                let mut applied = 0;
                for (t, ticket) in self.targets.iter().zip(tickets) {
                    if t.apply(ticket, |c| c.fill_or(options.clone(), self.empty_label)) {
                        applied += 1;
                    }
                }
                if applied == 0 {
                    debug!("discarding stale response ({count} options)");
                    LoadOutcome::Stale
                } else {
                    LoadOutcome::Applied { items: count }
                }
            }
            Err(e) => {
                let mut applied = 0;
                for (t, ticket) in self.targets.iter().zip(tickets) {
                    if t.apply(ticket, SelectControl::fail) {
                        applied += 1;
                    }
                }
                if applied == 0 {
                    debug!("discarding stale failure: {e}");
                    return LoadOutcome::Stale;
                }
                warn!("dependent load failed: {e}");
                self.shell.toast(self.failure_notice);
                LoadOutcome::Failed
            }
        }
    }
}
