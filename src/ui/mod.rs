//! Modelos de vista: selectores, tablas, avisos y navegación.

pub mod latest;
pub mod list;
pub mod loader;
pub mod render;
pub mod select;
pub mod shell;

pub use latest::{Latest, Ticket};
pub use list::{ListState, load_list};
pub use loader::{Cascade, DependentSelect, LoadOutcome};
pub use select::{AsOption, OptionItem, SelectControl, SelectStatus};
pub use shell::{Notice, Shell};
