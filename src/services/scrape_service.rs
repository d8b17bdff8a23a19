use scraper::{Html, Selector};
use std::sync::Arc;

use crate::clients::page_fetcher::PageFetcher;
use crate::error::{Error, Result};

/// Upper bound on extracted article text, to keep the downstream prompt
/// within the completion context. The cut is a silent prefix truncation.
pub const MAX_CONTENT_CHARS: usize = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub text: String,
}

#[derive(Clone)]
pub struct ScrapeService {
    fetcher: Arc<dyn PageFetcher>,
}

impl ScrapeService {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle> {
        let html = self.fetcher.fetch(url).await?;
        extract_article(&html)
    }
}

/// Pulls the article heading and body-paragraph text out of a Wikipedia
/// page. Infoboxes, sidebars and reference tables are skipped because only
/// `<p>` elements inside the content container are read.
pub fn extract_article(html: &str) -> Result<ExtractedArticle> {
    let document = Html::parse_document(html);

    let heading = selector("#firstHeading")?;
    let paragraphs = selector("#mw-content-text p")?;
    let content_root = selector("#mw-content-text")?;

    if document.select(&content_root).next().is_none() {
        return Err(Error::Extraction(
            "Could not find article content".to_string(),
        ));
    }

    let title = document
        .select(&heading)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut text = document
        .select(&paragraphs)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&mut text, MAX_CONTENT_CHARS);

    if text.trim().is_empty() {
        return Err(Error::Extraction(
            "Could not extract content from the page".to_string(),
        ));
    }

    Ok(ExtractedArticle { title, text })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| Error::Internal(format!("Invalid selector {}: {:?}", css, e)))
}

fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiki_page(title: &str, paragraphs: &[&str]) -> String {
        let body = paragraphs
            .iter()
            .map(|p| format!("<p>{}</p>", p))
            .collect::<String>();
        format!(
            r#"<html><body>
            <h1 id="firstHeading">{}</h1>
            <div id="mw-content-text">
                <table class="infobox"><tr><td>Born 1912</td></tr></table>
                {}
                <div class="reflist">Reference noise</div>
            </div>
            </body></html>"#,
            title, body
        )
    }

    #[test]
    fn extracts_title_and_paragraphs_in_order() {
        let html = wiki_page("Alan Turing", &["First paragraph.", "Second paragraph."]);
        let article = extract_article(&html).unwrap();
        assert_eq!(article.title, "Alan Turing");
        assert_eq!(article.text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn skips_infobox_and_reference_text() {
        let html = wiki_page("Alan Turing", &["Only this."]);
        let article = extract_article(&html).unwrap();
        assert!(!article.text.contains("Born 1912"));
        assert!(!article.text.contains("Reference noise"));
    }

    #[test]
    fn caps_text_at_max_content_chars() {
        let long = "x".repeat(MAX_CONTENT_CHARS + 5_000);
        let html = wiki_page("Long Article", &[&long]);
        let article = extract_article(&html).unwrap();
        assert_eq!(article.text.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut text = "é".repeat(10);
        truncate_chars(&mut text, 4);
        assert_eq!(text, "é".repeat(4));
    }

    #[test]
    fn missing_content_container_is_an_extraction_error() {
        let html = "<html><body><h1 id=\"firstHeading\">T</h1></body></html>";
        let err = extract_article(html).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn empty_paragraphs_are_an_extraction_error() {
        let html = wiki_page("Empty", &[]);
        let err = extract_article(&html).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn missing_heading_falls_back_to_unknown() {
        let html = r#"<html><body><div id="mw-content-text"><p>Text.</p></div></body></html>"#;
        let article = extract_article(html).unwrap();
        assert_eq!(article.title, "Unknown");
    }
}
