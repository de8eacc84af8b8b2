//! The rewrite passes behind [`crate::apply_text_formatting`].
//!
//! Code blocks are cut out first and carried as opaque markup; the header,
//! block-quote, bold and link passes then run, in that order, over the plain
//! text between them only.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Config, LinksConfig};
use crate::html::escape_html;
use crate::link::shorten_url;

/// A fenced code block. An unterminated fence runs to the end of input.
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)(?:```|\z)").unwrap());

/// Fenced code blocks, plus `<pre>` blocks already rendered by a previous run.
static FENCE_OR_PRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)(?:```|\z)|<pre[ >].*?</pre>").unwrap());

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(#{1,6})[ \t]+(.*)$").unwrap());

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").unwrap());

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s<>]+").unwrap());

/// An HTML tag. The name must end at whitespace, `/` or `>`, so
/// `<https://...>` is not a tag.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(?:[\s/][^<>]*)?>").unwrap());

/// Punctuation that ends a sentence rather than a URL.
const URL_TRAILING: &[char] = &['.', ',', ':', ';', '"', '\'', ')', ']'];

/// Angle brackets as written and as escaped; a URL ends at either.
const URL_BRACKETS: &[(&str, &str)] = &[("<", ">"), ("&lt;", "&gt;")];

#[derive(Debug, PartialEq)]
enum Fragment {
    /// Finished HTML that later passes must not touch.
    Markup(String),
    /// Plain text. `starts_line` is false when the text picks up mid-line
    /// right after a code block.
    Text { text: String, starts_line: bool },
}

/// Run all passes over `text`.
pub(crate) fn format_text(text: &str, config: &Config) -> String {
    split_code_blocks(text, config.escape.html)
        .into_iter()
        .map(|fragment| match fragment {
            Fragment::Markup(markup) => markup,
            Fragment::Text { text, starts_line } => {
                let text = format_headers(&text, starts_line);
                let text = format_block_quotes(&text, starts_line);
                let text = format_bold(&text);
                format_links(&text, &config.links)
            }
        })
        .collect()
}

/// Bold and links only, for single-line content such as list items.
pub(crate) fn format_inline(text: &str, config: &Config) -> String {
    let text = if config.escape.html {
        escape_html(text)
    } else {
        text.to_string()
    };
    let text = format_bold(&text);
    format_links(&text, &config.links)
}

fn split_code_blocks(text: &str, escape: bool) -> Vec<Fragment> {
    // Raw <pre> is only trusted when the caller is not asking for escaping
    let pattern = if escape { &*FENCE } else { &*FENCE_OR_PRE };

    let mut fragments = Vec::new();
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut fragments, text, last, whole.start(), escape);

        let markup = match caps.get(1) {
            Some(body) if escape => format!("<pre><code>{}</code></pre>", escape_html(body.as_str())),
            Some(body) => format!("<pre><code>{}</code></pre>", body.as_str()),
            None => whole.as_str().to_string(),
        };
        fragments.push(Fragment::Markup(markup));
        last = whole.end();
    }
    push_text(&mut fragments, text, last, text.len(), escape);

    fragments
}

fn push_text(fragments: &mut Vec<Fragment>, source: &str, start: usize, end: usize, escape: bool) {
    if start >= end {
        return;
    }
    let starts_line = start == 0 || source[..start].ends_with('\n');
    let slice = &source[start..end];
    let text = if escape {
        escape_text(slice, starts_line)
    } else {
        slice.to_string()
    };
    fragments.push(Fragment::Text { text, starts_line });
}

/// Escape `&`, `<` and `>`, except a `>` that opens a line, which is a quote
/// marker still needed by the block-quote pass.
fn escape_text(text: &str, starts_line: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_line_start = starts_line;
    for ch in text.chars() {
        match ch {
            '>' if at_line_start => out.push('>'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
        at_line_start = ch == '\n' || (at_line_start && ch != '>' && ch.is_whitespace());
    }
    out
}

fn format_headers(text: &str, starts_line: bool) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 && !starts_line {
                return Cow::Borrowed(line);
            }
            match HEADER.captures(line) {
                Some(caps) => {
                    let level = caps[1].len();
                    Cow::Owned(format!("<h{level}>{}</h{level}>", &caps[2]))
                }
                None => Cow::Borrowed(line),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of a `>` line with the marker and one following space removed.
fn quote_content(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn format_block_quotes(text: &str, starts_line: bool) -> String {
    let mut out: Vec<Cow<'_, str>> = Vec::new();
    // Some while inside a quote
    let mut quote: Option<Vec<&str>> = None;

    for (i, line) in text.split('\n').enumerate() {
        let content = if i == 0 && !starts_line {
            None
        } else {
            quote_content(line)
        };

        match content {
            Some(content) => quote.get_or_insert_with(Vec::new).push(content),
            None => {
                if let Some(lines) = quote.take() {
                    out.push(Cow::Owned(close_quote(&lines)));
                }
                out.push(Cow::Borrowed(line));
            }
        }
    }
    if let Some(lines) = quote.take() {
        out.push(Cow::Owned(close_quote(&lines)));
    }

    out.join("\n")
}

fn close_quote(lines: &[&str]) -> String {
    format!("<blockquote>{}</blockquote>", lines.join("<br>"))
}

fn format_bold(text: &str) -> String {
    BOLD.replace_all(text, "<strong>$1</strong>").into_owned()
}

/// Turn bare URLs into anchors, skipping tag markup and anything already
/// inside an `<a>` element.
fn format_links(text: &str, links: &LinksConfig) -> String {
    let mut out = String::with_capacity(text.len());
    let mut anchor_depth = 0usize;
    let mut last = 0;

    for tag in TAG.find_iter(text) {
        let between = &text[last..tag.start()];
        if anchor_depth == 0 {
            linkify(between, links, &mut out);
        } else {
            out.push_str(between);
        }

        match tag_name(tag.as_str()) {
            ("a", false) => anchor_depth += 1,
            ("a", true) => anchor_depth = anchor_depth.saturating_sub(1),
            _ => {}
        }
        out.push_str(tag.as_str());
        last = tag.end();
    }

    let rest = &text[last..];
    if anchor_depth == 0 {
        linkify(rest, links, &mut out);
    } else {
        out.push_str(rest);
    }
    out
}

/// Lowercased-ASCII name of a tag and whether it is a closing tag.
fn tag_name(tag: &str) -> (&str, bool) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>');
    let (inner, closing) = match inner.strip_prefix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = &inner[..end];
    if name.eq_ignore_ascii_case("a") {
        ("a", closing)
    } else {
        (name, closing)
    }
}

fn linkify(text: &str, links: &LinksConfig, out: &mut String) {
    let mut last = 0;
    let mut pos = 0;
    while let Some(m) = BARE_URL.find_at(text, pos) {
        let url = url_extent(m.as_str());
        let end = m.start() + url.len();
        let before = &text[last..m.start()];

        match shorten_url(url, links.label_max_len, &links.ellipsis) {
            Some(label) => {
                // <https://...> drops its brackets
                let (before, skip) = match autolink_brackets(before, &text[end..]) {
                    Some((open, close)) => (&before[..before.len() - open], close),
                    None => (before, 0),
                };
                out.push_str(before);
                out.push_str("<a href=\"");
                out.push_str(&url.replace('"', "&quot;"));
                out.push('"');
                if links.new_tab {
                    out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                }
                out.push('>');
                out.push_str(&label);
                out.push_str("</a>");
                last = end + skip;
            }
            None => {
                out.push_str(before);
                out.push_str(url);
                last = end;
            }
        }
        pos = last;
    }
    out.push_str(&text[last..]);
}

/// The URL part of a regex match: cut at an escaped angle bracket, then
/// without trailing punctuation.
fn url_extent(matched: &str) -> &str {
    let end = ["&lt;", "&gt;"]
        .iter()
        .filter_map(|bracket| matched.find(bracket))
        .min()
        .unwrap_or(matched.len());
    matched[..end].trim_end_matches(URL_TRAILING)
}

/// Byte lengths of a bracket pair wrapping a URL, if `before` ends with an
/// opening bracket and `after` starts with the matching close.
fn autolink_brackets(before: &str, after: &str) -> Option<(usize, usize)> {
    URL_BRACKETS
        .iter()
        .find(|(open, close)| before.ends_with(open) && after.starts_with(close))
        .map(|(open, close)| (open.len(), close.len()))
}
