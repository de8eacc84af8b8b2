use url::Url;

/// Build the visible label for a bare URL: host, then path unless it is just
/// `/`, cut to `max_len` characters with `ellipsis` appended.
///
/// Returns `None` if the URL does not parse or has no host.
pub fn shorten_url(raw: &str, max_len: usize, ellipsis: &str) -> Option<String> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(url = raw, error = %e, "leaving unparsable URL as text");
            return None;
        }
    };
    let host = url.host_str()?;

    let mut label = host.to_string();
    if url.path() != "/" {
        label.push_str(url.path());
    }

    if label.chars().count() > max_len {
        let mut short: String = label.chars().take(max_len).collect();
        short.push_str(ellipsis);
        return Some(short);
    }
    Some(label)
}
