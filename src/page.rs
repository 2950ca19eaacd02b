use anyhow::{anyhow, Context, Result};
use log::debug;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::io::Read;

/// A loaded document: where it came from and its flattened visible text.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub text: String,
}

/// Subtrees whose text never renders on the page.
const SKIPPED_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Loads the page named by `source`: an http(s) URL, `-` for stdin, or a
/// local file path. `page_url` overrides the provenance URL recorded in
/// exported events.
pub async fn load_page(source: &str, page_url: Option<&str>) -> Result<Page> {
    let (html, default_url) = if source == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read page from stdin")?;
        (html, "stdin".to_string())
    } else if source.starts_with("http://") || source.starts_with("https://") {
        let client = Client::new();
        let response = client
            .get(source)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", source))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Page fetch failed: {} returned {}", source, status));
        }
        let html = response.text().await.context("Failed to read page body")?;
        (html, source.to_string())
    } else {
        let html = std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source))?;
        (html, format!("file://{}", source))
    };

    let url = page_url.map(str::to_string).unwrap_or(default_url);
    let text = visible_text(&html);
    debug!("Flattened {} bytes of HTML into {} chars of text", html.len(), text.len());
    Ok(Page { url, text })
}

/// Flattens a document to the text a reader would see: scripts, styles
/// and the head are skipped, whitespace runs collapse to single spaces.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut buf = String::new();
    collect_text(document.root_element(), &mut buf);
    buf.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef, buf: &mut String) {
    if SKIPPED_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            buf.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, buf);
            buf.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_and_styles_are_invisible() {
        let html = "<html><body>\
                    <script>var x = 1;</script>\
                    <p>Launch party</p>\
                    <style>p { color: red }</style>\
                    <noscript>enable javascript</noscript>\
                    </body></html>";
        assert_eq!(visible_text(html), "Launch party");
    }

    #[test]
    fn head_content_is_invisible() {
        let html = "<html><head><title>Page Title</title></head>\
                    <body><p>Body text</p></body></html>";
        assert_eq!(visible_text(html), "Body text");
    }

    #[test]
    fn whitespace_collapses_across_blocks() {
        let html = "<div>\n   Team    Sync\n</div><p>at   2pm</p>";
        assert_eq!(visible_text(html), "Team Sync at 2pm");
    }

    #[test]
    fn nested_inline_markup_flattens() {
        let html = "<p>Launch <b>party</b> tonight</p>";
        assert_eq!(visible_text(html), "Launch party tonight");
    }

    #[test]
    fn comments_are_invisible() {
        let html = "<body><!-- hidden note --><p>shown</p></body>";
        assert_eq!(visible_text(html), "shown");
    }

    #[test]
    fn empty_page_flattens_to_empty_text() {
        assert_eq!(visible_text("<html><body></body></html>"), "");
    }
}
