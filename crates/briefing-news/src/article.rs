use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{NewsError, Result};

static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| NewsError::Parse(format!("invalid selector {selector}: {e}")))
}

/// Readable text of an article page.
///
/// Prefers `<meta name="description">`; otherwise joins every paragraph.
pub fn extract_article_text(html: &str) -> Result<String> {
    let meta_selector = parse_selector(r#"meta[name="description"]"#)?;
    let paragraph_selector = parse_selector("p")?;

    let document = Html::parse_document(html);

    // A description with any content wins, even if it trims to nothing.
    let description = document
        .select(&meta_selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|s| !s.is_empty());
    if let Some(description) = description {
        return Ok(description.trim().to_string());
    }

    let paragraphs = document
        .select(&paragraph_selector)
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(MULTI_SPACE_RE
        .replace_all(&paragraphs, " ")
        .trim()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_meta_description() {
        let html = r#"<html><head>
            <meta name="description" content="  제룡전기가 상한가를 기록했다.  ">
            </head><body><p>본문</p></body></html>"#;
        assert_eq!(
            extract_article_text(html).unwrap(),
            "제룡전기가 상한가를 기록했다."
        );
    }

    #[test]
    fn joins_paragraphs_without_description() {
        let html = r#"<html><head><meta name="description" content=""></head>
            <body>
              <p>  첫 문단 <b>강조</b>  </p>
              <div><p>둘째    문단</p></div>
              <p></p>
            </body></html>"#;
        assert_eq!(
            extract_article_text(html).unwrap(),
            "첫 문단 강조 둘째 문단"
        );
    }

    #[test]
    fn blank_description_still_wins_over_paragraphs() {
        let html = r#"<html><head><meta name="description" content="   "></head>
            <body><p>본문 상한가</p></body></html>"#;
        assert_eq!(extract_article_text(html).unwrap(), "");
    }

    #[test]
    fn page_without_text_is_empty() {
        assert_eq!(extract_article_text("<html></html>").unwrap(), "");
    }
}
