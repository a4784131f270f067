//! Controladores de página. Cada método corresponde a un evento del usuario
//! (cambio de selector, click en un botón) sobre la página original.

pub mod class_timetable;
pub mod data_input;
pub mod faculty;
pub mod lecture_allocation;
pub mod login;
pub mod practical_allocation;
pub mod preference_review;
pub mod timetable;

pub use class_timetable::ClassTimetablePage;
pub use data_input::{DataInputPage, Section};
pub use faculty::FacultyPage;
pub use lecture_allocation::LectureAllocationPage;
pub use login::LoginPage;
pub use practical_allocation::PracticalAllocationPage;
pub use preference_review::PreferenceReviewPage;
pub use timetable::TimetablePage;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::{ClientError, ErrorKind};
use crate::models::StatusMessage;
use crate::ui::Shell;

/// Reporta el fallo de un envío en una página con región de mensajes: el
/// texto del servidor va a la región; sin él (o si falló el transporte) se
/// usa un aviso genérico bloqueante.
pub(crate) fn report_failure(
    shell: &Shell,
    region: &Mutex<Option<StatusMessage>>,
    error: &ClientError,
    generic: &str,
) {
    warn!("{generic}: {error}");
    match (error.kind(), error.server_message()) {
        (ErrorKind::Server, Some(text)) => *region.lock() = Some(StatusMessage::error(text)),
        _ => shell.alert(generic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_failure_prefers_message_region() {
        let shell = Shell::new();
        let region = Mutex::new(None);

        let server = ClientError::Server { status: 400, message: Some("Duplicate preference".into()) };
        report_failure(&shell, &region, &server, "Failed to submit preferences");
        assert_eq!(region.lock().as_ref().map(|m| m.text.as_str()), Some("Duplicate preference"));
        assert!(shell.alerts().is_empty());

        let transport = ClientError::Transport("connection refused".into());
        report_failure(&shell, &region, &transport, "Failed to submit preferences");
        assert_eq!(shell.alerts(), vec!["Failed to submit preferences".to_string()]);
    }
}
