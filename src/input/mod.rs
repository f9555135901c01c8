//! Input resolver
//!
//! Turns what the user pasted into the text to process: a URL is fetched and
//! reduced to its article text, anything else is used verbatim.

use anyhow::Context;
use reqwest::{Client, Url, header};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Wrap width handed to the HTML-to-text converter
const TEXT_WIDTH: usize = 100;

/// Failure to turn a URL into article text
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch article from URL: {0}")]
    Request(String),

    #[error("Failed to fetch article from URL: server returned status {0}")]
    Status(u16),

    #[error("Failed to fetch article from URL: {0}")]
    Body(String),

    #[error("Failed to fetch article from URL: no article text found")]
    NoContent,
}

/// Return the parsed URL when `input` has both a scheme and a host
pub fn parse_url(input: &str) -> Option<Url> {
    let url = Url::parse(input.trim()).ok()?;
    url.host_str().filter(|host| !host.is_empty())?;
    Some(url)
}

/// Fetches articles over HTTP
#[derive(Clone)]
pub struct InputResolver {
    client: Client,
}

impl InputResolver {
    /// Create a resolver whose fetches give up after `timeout` seconds
    pub fn new(timeout: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(concat!("tim-playground/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Resolve raw input to the text that should be processed
    pub async fn resolve(&self, input: &str) -> Result<String, FetchError> {
        match parse_url(input) {
            Some(url) => self.fetch_article(url).await,
            None => Ok(input.to_string()),
        }
    }

    async fn fetch_article(&self, url: Url) -> Result<String, FetchError> {
        info!("Fetching article from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Article fetch for {} returned status {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let is_plain_text = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/plain"));

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        let text = if is_plain_text {
            body.trim().to_string()
        } else {
            extract_article_text(&body)?
        };

        if text.is_empty() {
            return Err(FetchError::NoContent);
        }

        debug!("Extracted {} chars of article text", text.len());
        Ok(text)
    }
}

/// Convert the main content of an HTML page to plain text
///
/// Looks for `<article>`, then `<main>`, then `<body>`; falls back to the
/// whole document.
pub fn extract_article_text(html: &str) -> Result<String, FetchError> {
    let fragment = ["article", "main", "body"]
        .iter()
        .find_map(|tag| element_fragment(html, tag))
        .unwrap_or(html);

    let text = html2text::from_read(fragment.as_bytes(), TEXT_WIDTH)
        .map_err(|e| FetchError::Body(e.to_string()))?;
    Ok(text.trim().to_string())
}

/// Slice of `html` spanning the first `<tag ...>...</tag>` element
fn element_fragment<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut search_from = 0;
    let start = loop {
        let idx = search_from + lower[search_from..].find(&open)?;
        // Reject prefixes such as <mainframe> or <bodyguard>.
        match lower.as_bytes().get(idx + open.len()) {
            Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'/') => break idx,
            _ => search_from = idx + open.len(),
        }
    };
    let end = lower[start..].find(&close).map(|rel| start + rel + close.len())?;
    Some(&html[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_detection_needs_scheme_and_host() {
        assert!(parse_url("https://example.com/news/1").is_some());
        assert_eq!(
            parse_url("  http://localhost:8080/a  ").map(|url| url.port()),
            Some(Some(8080))
        );
        assert!(parse_url("example.com/news").is_none());
        assert!(parse_url("mailto:editor@example.com").is_none());
        assert!(parse_url("Breaking: markets rally as rates fall").is_none());
        assert!(parse_url("").is_none());
    }

    #[tokio::test]
    async fn test_plain_text_is_returned_unchanged() {
        let resolver = InputResolver::new(5).unwrap();
        let input = "  The council voted 7-2.\nResidents object.  ";
        assert_eq!(resolver.resolve(input).await.unwrap(), input);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_fetch_error() {
        let resolver = InputResolver::new(2).unwrap();
        let result = resolver.resolve("http://127.0.0.1:1/article").await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    const STORY: &str = r#"<html><body>
        <nav>Sections Sports Weather</nav>
        <article><h1>Bridge reopens</h1><p>Traffic resumed on Monday.</p></article>
        <footer>Subscribe today</footer>
        </body></html>"#;

    /// Serve a handful of fixed pages on an ephemeral local port
    async fn serve_pages() -> String {
        use axum::{Router, http::StatusCode, response::Html, routing::get};

        let app = Router::new()
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route("/empty", get(|| async { Html("<html><body></body></html>") }))
            .route(
                "/plain",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                        "\n  Plain article text.\n\n",
                    )
                }),
            )
            .route("/story", get(|| async { Html(STORY) }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_outcomes() {
        let base = serve_pages().await;
        let resolver = InputResolver::new(5).unwrap();

        let missing = resolver.resolve(&format!("{base}/missing")).await;
        assert!(matches!(missing, Err(FetchError::Status(404))));

        let empty = resolver.resolve(&format!("{base}/empty")).await;
        assert!(matches!(empty, Err(FetchError::NoContent)));

        let plain = resolver.resolve(&format!("{base}/plain")).await.unwrap();
        assert_eq!(plain, "Plain article text.");

        let story = resolver.resolve(&format!("{base}/story")).await.unwrap();
        assert!(story.contains("Bridge reopens"));
        assert!(story.contains("Traffic resumed on Monday."));
        assert!(!story.contains("Sections"));
        assert!(!story.contains("Subscribe"));
    }

    #[test]
    fn test_extract_prefers_article_element() {
        let html = r#"<html><head><title>t</title></head><body>
            <nav>Menu Home About</nav>
            <ARTICLE class="story"><h1>Headline</h1><p>First paragraph.</p></ARTICLE>
            <footer>Copyright</footer></body></html>"#;
        let text = extract_article_text(html).unwrap();
        assert!(text.contains("Headline"));
        assert!(text.contains("First paragraph."));
        assert!(!text.contains("Menu"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn test_extract_falls_back_to_body() {
        let html = "<html><body><mainframe>x</mainframe><p>Only body text.</p></body></html>";
        let text = extract_article_text(html).unwrap();
        assert!(text.contains("Only body text."));
    }

    #[test]
    fn test_element_fragment_without_close_tag() {
        assert_eq!(element_fragment("<article>unterminated", "article"), None);
    }
}
