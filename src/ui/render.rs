//! Helpers de renderizado con `maud`.
//!
//! Todo el texto interpolado (nombres de ramos, profesores, clases) pasa por
//! el escape de `maud`; nunca se usa `PreEscaped` con datos del servidor.

use maud::{Markup, html};

use super::select::SelectControl;
use crate::models::{StatusMessage, Tone};

pub fn select(name: &str, control: &SelectControl) -> Markup {
    let selected = control.value().unwrap_or_default();
    html! {
        select name=(name) {
            @for opt in control.options() {
                @if !opt.value.is_empty() && opt.value == selected {
                    option value=(opt.value) selected { (opt.label) }
                } @else {
                    option value=(opt.value) { (opt.label) }
                }
            }
        }
    }
}

pub fn status_message(id: &str, message: Option<&StatusMessage>) -> Markup {
    html! {
        @match message {
            Some(m) => {
                @let color = match m.tone { Tone::Success => "green", Tone::Error => "red" };
                p id=(id) style={ "color: " (color) } { (m.text) }
            }
            None => { p id=(id) {} }
        }
    }
}

/// Fila informativa que ocupa todo el ancho de la tabla.
pub fn info_row(colspan: usize, text: &str) -> Markup {
    html! {
        tr { td colspan=(colspan) align="center" { (text) } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::select::OptionItem;

    #[test]
    fn test_select_marks_selected_and_escapes_labels() {
        let mut c = SelectControl::with_items(
            "Select Teacher",
            vec![OptionItem::new("1", "<b>Rao</b>"), OptionItem::new("2", "Shah & Co")],
        );
        c.select("2").unwrap();

        let out = select("teacher", &c).into_string();
        assert!(out.starts_with(r#"<select name="teacher"><option value="">Select Teacher</option>"#));
        assert!(out.contains("&lt;b&gt;Rao&lt;/b&gt;"));
        assert!(out.contains(r#"<option value="2" selected>Shah &amp; Co</option>"#));
    }

    #[test]
    fn test_status_message_colors() {
        let ok = StatusMessage::success("Preferences submitted successfully");
        let out = status_message("msg", Some(&ok)).into_string();
        assert_eq!(out, r#"<p id="msg" style="color: green">Preferences submitted successfully</p>"#);
        assert_eq!(status_message("msg", None).into_string(), r#"<p id="msg"></p>"#);
    }
}
