use std::sync::LazyLock;

use regex::Regex;

/// `* item`, `- item` or `12. item`, with exactly one separator space.
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([*-])|([0-9]+)\.) (.*)$").unwrap());

/// Which marker syntax produced a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Numbered,
}

/// A single list item, with the items nested beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: String,
    pub kind: ListKind,
    /// The literal number of a numbered marker; `None` for bullets.
    pub ordinal: Option<u64>,
    pub children: Vec<ListItem>,
    /// Lines of the nested block that did not parse as child items, as
    /// written. Empty for most items.
    pub continuation: Vec<String>,
}

/// A recognised marker and the text following it.
pub(crate) struct Marker<'a> {
    pub kind: ListKind,
    pub ordinal: Option<u64>,
    pub content: &'a str,
}

/// Number of leading whitespace characters.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Match a list marker at the start of an already-trimmed line.
pub(crate) fn parse_marker(trimmed: &str) -> Option<Marker<'_>> {
    let caps = MARKER.captures(trimmed)?;
    let content = caps.get(3).map_or("", |m| m.as_str());

    if caps.get(1).is_some() {
        return Some(Marker {
            kind: ListKind::Bullet,
            ordinal: None,
            content,
        });
    }

    let digits = caps.get(2)?.as_str();
    // Absurdly long numbers still mark a numbered item
    let ordinal = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(Marker {
        kind: ListKind::Numbered,
        ordinal: Some(ordinal),
        content,
    })
}

/// Whether `line`, ignoring its indentation, starts a list item.
pub fn is_list_line(line: &str) -> bool {
    parse_marker(line.trim_start()).is_some()
}

/// Parse a nested list starting at `start`, with direct items at `base`
/// indentation.
pub fn parse_list_lines<S: AsRef<str>>(lines: &[S], start: usize, base: usize) -> Vec<ListItem> {
    parse_list_block(lines, start, base).0
}

/// Like [`parse_list_lines`], but also returns the index of the first line
/// that was not consumed.
///
/// Scanning stops at the end of input, at a line indented less than `base`,
/// or at a line at `base` that carries no marker. Lines indented deeper than
/// `base` right after an item become that item's children, parsed with the
/// indentation of the first of them as their own base. Nested lines that
/// no child item claims are kept in [`ListItem::continuation`].
///
/// Each level rescans its nested block and recurses once per indentation
/// step, so cost is O(lines x depth) in time and stack.
pub fn parse_list_block<S: AsRef<str>>(
    lines: &[S],
    start: usize,
    base: usize,
) -> (Vec<ListItem>, usize) {
    let mut items = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i].as_ref();
        let indent = indentation(line);

        if indent < base {
            break;
        }
        if indent > base {
            // Deeper than any item seen so far at this level
            tracing::debug!(line = i, "skipping orphan list line");
            i += 1;
            continue;
        }

        let Some(marker) = parse_marker(line.trim_start()) else {
            break;
        };
        i += 1;

        let nested_start = i;
        while i < lines.len() && indentation(lines[i].as_ref()) > base {
            i += 1;
        }
        let (children, continuation) = if i > nested_start {
            let nested_base = indentation(lines[nested_start].as_ref());
            let (children, resume) = parse_list_block(&lines[..i], nested_start, nested_base);
            let rest = lines[resume..i]
                .iter()
                .map(|line| line.as_ref().to_string())
                .collect();
            (children, rest)
        } else {
            (Vec::new(), Vec::new())
        };

        items.push(ListItem {
            content: marker.content.to_string(),
            kind: marker.kind,
            ordinal: marker.ordinal,
            children,
            continuation,
        });
    }

    (items, i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(content: &str, children: Vec<ListItem>) -> ListItem {
        ListItem {
            content: content.to_string(),
            kind: ListKind::Bullet,
            ordinal: None,
            children,
            continuation: Vec::new(),
        }
    }

    fn numbered(n: u64, content: &str) -> ListItem {
        ListItem {
            content: content.to_string(),
            kind: ListKind::Numbered,
            ordinal: Some(n),
            children: Vec::new(),
            continuation: Vec::new(),
        }
    }

    #[test]
    fn nested_bullets() {
        let items = parse_list_lines(&["- a", "  - nested a1", "- b"], 0, 0);
        assert_eq!(
            items,
            vec![
                bullet("a", vec![bullet("nested a1", vec![])]),
                bullet("b", vec![]),
            ]
        );
    }

    #[test]
    fn numbered_items() {
        let items = parse_list_lines(&["1. first", "2. second"], 0, 0);
        assert_eq!(items, vec![numbered(1, "first"), numbered(2, "second")]);
    }

    #[test]
    fn star_bullets_and_literal_ordinals() {
        let items = parse_list_lines(&["* x", "7. seven", "42. answer"], 0, 0);
        assert_eq!(items[0], bullet("x", vec![]));
        assert_eq!(items[1].ordinal, Some(7));
        assert_eq!(items[2].ordinal, Some(42));
    }

    #[test]
    fn only_one_separator_space_is_stripped() {
        let items = parse_list_lines(&["-  spaced"], 0, 0);
        assert_eq!(items[0].content, " spaced");
    }

    #[test]
    fn shallower_line_halts_without_being_consumed() {
        let lines = ["    - deep", "    - deeper sibling", "  - shallow", "- top"];
        let (items, next) = parse_list_block(&lines, 0, 4);
        assert_eq!(items.len(), 2);
        assert_eq!(next, 2);
        assert_eq!(lines[next], "  - shallow");
    }

    #[test]
    fn non_marker_line_terminates_level() {
        let lines = ["- a", "- b", "plain text", "- c"];
        let (items, next) = parse_list_block(&lines, 0, 0);
        assert_eq!(items.len(), 2);
        assert_eq!(next, 2);
    }

    #[test]
    fn orphan_deep_line_is_skipped() {
        let lines = ["    stray", "- a"];
        let items = parse_list_lines(&lines, 0, 0);
        assert_eq!(items, vec![bullet("a", vec![])]);
    }

    #[test]
    fn nested_block_is_consumed_even_past_non_markers() {
        // The nested block ends at the first line back at the base level
        let lines = ["- a", "  continuation", "  - after", "- b"];
        let (items, next) = parse_list_block(&lines, 0, 0);
        assert_eq!(next, 4);
        assert_eq!(items.len(), 2);
        assert!(items[0].children.is_empty());
        assert_eq!(items[0].continuation, vec!["  continuation", "  - after"]);
    }

    #[test]
    fn continuation_line_under_numbered_item() {
        let lines = ["1. Step one", "   details here", "2. Step two"];
        let items = parse_list_lines(&lines, 0, 0);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].continuation, vec!["   details here"]);
        assert!(items[1].continuation.is_empty());
    }

    #[test]
    fn line_between_levels_follows_children() {
        let lines = ["- a", "    - deep", "  shallower", "- b"];
        let items = parse_list_lines(&lines, 0, 0);
        assert_eq!(items[0].children, vec![bullet("deep", vec![])]);
        assert_eq!(items[0].continuation, vec!["  shallower"]);
        assert_eq!(items[1], bullet("b", vec![]));
    }

    #[test]
    fn three_levels() {
        let lines = ["1. one", "   - two", "     * three", "   - two b", "2. next"];
        let items = parse_list_lines(&lines, 0, 0);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].children.len(), 2);
        assert_eq!(items[0].children[0].children[0].content, "three");
        assert_eq!(items[1].ordinal, Some(2));
        assert!(items[1].children.is_empty());
    }

    #[test]
    fn start_index_is_respected() {
        let lines = vec!["intro".to_string(), "- a".to_string()];
        let items = parse_list_lines(&lines, 1, 0);
        assert_eq!(items, vec![bullet("a", vec![])]);
    }

    #[test]
    fn markers_need_a_space() {
        assert!(!is_list_line("-a"));
        assert!(!is_list_line("1.a"));
        assert!(!is_list_line("**bold**"));
        assert!(is_list_line("   - a"));
        assert!(is_list_line("10. a"));
    }

    #[test]
    fn huge_ordinal_saturates() {
        let items = parse_list_lines(&["99999999999999999999999. big"], 0, 0);
        assert_eq!(items[0].kind, ListKind::Numbered);
        assert_eq!(items[0].ordinal, Some(u64::MAX));
    }

    #[test]
    fn empty_input() {
        let lines: [&str; 0] = [];
        assert_eq!(parse_list_block(&lines, 0, 0), (Vec::new(), 0));
    }
}
