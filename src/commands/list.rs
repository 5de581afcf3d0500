//! Command: list themes and configs.
use crate::config::Config;

/// Render a `Found <label>:` header followed by one tab-indented name per line.
#[must_use]
pub fn render<'a>(label: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = format!("Found {label}:\n");
    for name in names {
        out.push('\t');
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Print the requested listings to stdout, themes first.
#[allow(clippy::print_stdout)]
pub fn run(config: &Config, themes: bool, configs: bool) {
    if themes {
        print!("{}", render("themes", config.theme_names()));
    }
    if configs {
        print!("{}", render("configs", config.definition_names()));
    }
}
