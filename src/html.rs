use crate::config::Config;
use crate::list::{ListItem, ListKind, indentation, is_list_line, parse_list_block};
use crate::passes::{format_inline, format_text};

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a whole chat message: list runs become `<ul>`/`<ol>` markup, every
/// other run of lines goes through the formatting passes.
pub fn render_message(text: &str, config: &Config) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut pieces: Vec<String> = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut in_fence = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if config.lists.enabled && !in_fence && is_list_line(line) {
            flush_prose(&mut prose, &mut pieces, config);
            let (items, next) = parse_list_block(&lines, i, indentation(line));
            pieces.push(list_to_html(&items, config));
            i = next;
            continue;
        }

        // An odd number of fences opens or closes a code block
        if line.matches("```").count() % 2 == 1 {
            in_fence = !in_fence;
        }
        prose.push(line);
        i += 1;
    }
    flush_prose(&mut prose, &mut pieces, config);

    pieces.join("\n")
}

fn flush_prose(prose: &mut Vec<&str>, pieces: &mut Vec<String>, config: &Config) {
    if prose.is_empty() {
        return;
    }
    pieces.push(format_text(&prose.join("\n"), config));
    prose.clear();
}

/// Render parsed list items as nested HTML lists.
pub fn list_to_html(items: &[ListItem], config: &Config) -> String {
    let mut out = String::new();
    emit_list(items, config, &mut out);
    out
}

fn emit_list(items: &[ListItem], config: &Config, out: &mut String) {
    // A change of marker kind starts a new list
    for group in items.chunk_by(|a, b| a.kind == b.kind) {
        let close = match group[0].kind {
            ListKind::Bullet => {
                out.push_str("<ul>");
                "</ul>"
            }
            ListKind::Numbered => {
                match group[0].ordinal {
                    Some(start) if start != 1 => {
                        out.push_str(&format!("<ol start=\"{start}\">"));
                    }
                    _ => out.push_str("<ol>"),
                }
                "</ol>"
            }
        };

        for item in group {
            out.push_str("<li>");
            out.push_str(&format_inline(&item.content, config));
            if !item.children.is_empty() {
                emit_list(&item.children, config, out);
            }
            if !item.continuation.is_empty() {
                if item.children.is_empty() {
                    out.push_str("<br>");
                }
                out.push_str(&render_message(&dedent(&item.continuation), config));
            }
            out.push_str("</li>");
        }

        out.push_str(close);
    }
}

/// Join lines, stripping the indentation they all share.
fn dedent(lines: &[String]) -> String {
    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| line.chars().skip(common).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
