use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Style names shared between templates and render code.
pub mod names {
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
    pub const TITLE: &str = "title";
    pub const HEADER: &str = "header";
    pub const MUTED: &str = "muted";
    pub const TIME: &str = "time";
    pub const RUN_ID: &str = "run_id";
    pub const NAME: &str = "name";
    pub const ALERT: &str = "alert";
}

/// Named `console` styles applied by the template `style` filter.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    /// Unknown names and disabled color both leave the text untouched.
    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            _ => text.to_string(),
        }
    }
}

pub static SEO_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add(names::INFO, Style::new())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow())
        .add(names::ERROR, Style::new().red().bold())
        .add(names::TITLE, Style::new().bold())
        .add(names::HEADER, Style::new().bold().underlined())
        .add(names::MUTED, Style::new().color256(246))
        .add(names::TIME, Style::new().color256(246).italic())
        .add(names::RUN_ID, Style::new().cyan())
        .add(names::NAME, Style::new().yellow())
        .add(names::ALERT, Style::new().red())
});
