mod config;
mod error;
mod html;
mod link;
mod list;
mod passes;

pub use config::{Config, EscapeConfig, LinksConfig, ListsConfig};
pub use error::ConfigError;
pub use html::{escape_html, list_to_html};
pub use link::shorten_url;
pub use list::{
    ListItem, ListKind, indentation, is_list_line, parse_list_block, parse_list_lines,
};

/// Format chat message text into HTML using default config.
///
/// Runs, in order: code blocks, headers, block quotes, bold, bare links.
/// Raw `<` and `>` outside those constructs pass through unescaped unless
/// `escape.html` is enabled in the config.
pub fn apply_text_formatting(text: &str) -> String {
    apply_text_formatting_with_config(text, &Config::compiled_default())
}

/// Format chat message text into HTML with custom config.
pub fn apply_text_formatting_with_config(text: &str, config: &Config) -> String {
    passes::format_text(text, config)
}

/// Render a chat message, including its lists, using default config.
pub fn render_message(text: &str) -> String {
    render_message_with_config(text, &Config::compiled_default())
}

/// Render a chat message, including its lists, with custom config.
pub fn render_message_with_config(text: &str, config: &Config) -> String {
    html::render_message(text, config)
}
