// Biblioteca raíz del crate `timetable_portal`.
// Cliente del sistema de horarios y preferencias docentes: sesión, selectores
// en cascada, tabla de asignación de divisiones y los formularios de cada rol
// (login, profesor, HOD). Las páginas hablan con el backend REST a través del
// trait `Backend`.
pub mod allocation;
pub mod api_json;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod session;
pub mod ui;

pub use backend::{Backend, HttpBackend};
pub use config::Config;
pub use error::ClientError;
pub use session::Session;
