use std::future::Future;

use tracing::debug;

use super::latest::Latest;
use super::shell::Shell;
use crate::error::ClientError;

/// Estado de una tabla alimentada por una sola petición.
#[derive(Debug, Clone)]
pub enum ListState<T> {
    NotLoaded,
    Loading,
    Loaded(Vec<T>),
    Failed,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        ListState::NotLoaded
    }
}

impl<T> ListState<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            ListState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ListState::Loaded(_))
    }
}

/// Carga una lista en `cell` con semántica "la última gana". Devuelve el
/// número de filas recibidas, aunque la respuesta haya llegado tarde.
pub async fn load_list<T, Fut>(
    cell: &Latest<ListState<T>>,
    shell: &Shell,
    failure_notice: &str,
    fetch: Fut,
) -> Result<usize, ClientError>
where
    Fut: Future<Output = Result<Vec<T>, ClientError>>,
{
    let ticket = cell.issue(|s| *s = ListState::Loading);

    match fetch.await {
        Ok(rows) => {
            let n = rows.len();
            if !cell.apply(ticket, |s| *s = ListState::Loaded(rows)) {
                debug!("discarding stale list response ({n} rows)");
            }
            Ok(n)
        }
        Err(e) => {
            if cell.apply(ticket, |s| *s = ListState::Failed) {
                shell.toast(failure_notice);
            }
            Err(e)
        }
    }
}
