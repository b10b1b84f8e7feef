//! # Rendering
//!
//! Help listings are minijinja templates styled through a `style` filter. Styles
//! are plain `console::Style` values registered by name on a [`Theme`]; when the
//! terminal can't show colors the filter returns the text untouched.
//!
//! Layout (column widths, padding) is computed in Rust and handed to templates as
//! ready-made strings, so templates only decide structure and style.

use crate::error::Result;
use console::{Style, Term};
use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Prepended to text styled with a name the theme doesn't know.
pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

pub const COMMANDS_TEMPLATE: &str = include_str!("templates/commands.jinja");
pub const USAGE_TEMPLATE: &str = include_str!("templates/usage.jinja");

pub static SAK_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add("heading", Style::new().bold().underlined())
        .add("name", Style::new().cyan().bold())
        .add("description", Style::new())
});

#[derive(Clone, Default)]
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

    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text.to_string(),
            None => format!("{MISSING_STYLE_INDICATOR} {text}"),
        }
    }
}

/// Whether stdout can show ANSI styling.
pub fn stdout_supports_color() -> bool {
    Term::stdout().features().colors_supported()
}

pub fn render_with_color<T: Serialize>(
    template: &str,
    data: &T,
    theme: &Theme,
    use_color: bool,
) -> Result<String> {
    let mut env = Environment::new();
    let styles = theme.clone();
    env.add_filter("style", move |value: Value, name: String| -> String {
        styles.apply(&name, &value.to_string(), use_color)
    });
    env.add_template("inline", template)?;
    Ok(env.get_template("inline")?.render(data)?)
}
