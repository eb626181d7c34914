//! Fetching the calendar document.

use std::path::Path;

use schaukasten_core::{SchaukastenError, SchaukastenResult};
use tracing::debug;
use url::Url;

/// Turn a feed address into an `http(s)` URL.
///
/// `webcal://` is the same resource served over https.
pub fn normalize_url(raw: &str) -> SchaukastenResult<Url> {
    let transport = |reason: &str| SchaukastenError::Transport {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    let rewritten = match trimmed.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}"),
        None => trimmed.to_string(),
    };

    let url = Url::parse(&rewritten).map_err(|e| transport(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(transport("only http, https and webcal URLs are supported"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(transport("URL has no host"));
    }

    Ok(url)
}

/// Download the calendar document at `raw_url`.
pub async fn fetch_calendar(raw_url: &str) -> SchaukastenResult<String> {
    let url = normalize_url(raw_url)?;
    let transport = |reason: String| SchaukastenError::Transport {
        url: url.to_string(),
        reason,
    };

    debug!(%url, "fetching calendar");

    let response = reqwest::Client::new()
        .get(url.clone())
        .send()
        .await
        .map_err(|e| transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(transport(format!("server responded with {status}")));
    }

    let body = response.text().await.map_err(|e| transport(e.to_string()))?;
    debug!(bytes = body.len(), "calendar fetched");

    Ok(body)
}

/// Read a calendar document from disk instead of the network.
pub fn read_calendar_file(path: &Path) -> SchaukastenResult<String> {
    debug!(path = %path.display(), "reading calendar file");
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webcal_becomes_https() {
        let url = normalize_url("webcal://calendar.example.org/public/basic.ics").unwrap();
        assert_eq!(url.as_str(), "https://calendar.example.org/public/basic.ics");
    }

    #[test]
    fn test_https_is_kept() {
        let url = normalize_url("  https://example.org/a.ics ").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/a.ics");
    }

    #[test]
    fn test_invalid_urls_are_rejected() {
        for raw in ["", "example.org/a.ics", "ftp://example.org/a.ics", "file:///tmp/a.ics"] {
            let err = normalize_url(raw).unwrap_err();
            assert!(
                matches!(err, SchaukastenError::Transport { .. }),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_calendar_file(Path::new("/nonexistent/schaukasten.ics")).unwrap_err();
        assert!(matches!(err, SchaukastenError::Io(_)));
    }
}
