use leptos::prelude::*;
use mavigo_core::Theme;

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: RwSignal<Theme>,
}

/// Apply the theme by setting or removing the `data-theme` attribute on `<html>`.
/// `System` removes the attribute and leaves it to the CSS media query.
pub fn apply_theme(theme: Theme) {
    let Some(html) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let _ = match theme {
        Theme::Light | Theme::Dark => html.set_attribute("data-theme", theme.as_str()),
        Theme::System => html.remove_attribute("data-theme"),
    };
}

/// Cycles light, dark, system.
pub fn next_theme(theme: Theme) -> Theme {
    match theme {
        Theme::Light => Theme::Dark,
        Theme::Dark => Theme::System,
        Theme::System => Theme::Light,
    }
}

pub fn theme_icon(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\u{2600}",
        Theme::Dark => "\u{263E}",
        Theme::System => "\u{25D0}",
    }
}
