use scraper::{Html, Selector};

use crate::convert::{tidy_markdown, Converter, Html2MdConverter};
use crate::embed::decode_sentinels;
use crate::rewrite::rewrite_content;
use crate::types::{ExtractError, ParsedContent};

const TITLE_SELECTOR: &str = ".entry-header h1.entry-title";
const CONTENT_SELECTOR: &str = ".entry-content";

/// Trimmed text of the page title heading.
pub fn extract_title(html: &str) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    title_from_document(&document)
}

/// Full extraction: locate the content region, rewrite it, convert to
/// Markdown and pair the body with the page title and discovered images.
///
/// Pure transformation — no I/O. Downloading the returned images is the
/// caller's job.
pub fn extract_and_convert(html: &str) -> Result<ParsedContent, ExtractError> {
    extract_and_convert_with(html, &Html2MdConverter)
}

pub fn extract_and_convert_with(
    html: &str,
    converter: &dyn Converter,
) -> Result<ParsedContent, ExtractError> {
    let document = Html::parse_document(html);

    let selector = Selector::parse(CONTENT_SELECTOR).ok();
    let content = selector
        .as_ref()
        .and_then(|sel| document.select(sel).next())
        .ok_or(ExtractError::MissingContentRegion)?;

    let rewritten = rewrite_content(content);
    let markdown = converter.to_markdown(&rewritten.html);
    let body = tidy_markdown(&decode_sentinels(&markdown));
    let header = title_from_document(&document)?;

    Ok(ParsedContent {
        header,
        body,
        images: rewritten.images,
    })
}

fn title_from_document(document: &Html) -> Result<String, ExtractError> {
    let selector = Selector::parse(TITLE_SELECTOR).ok();
    let heading = selector
        .as_ref()
        .and_then(|sel| document.select(sel).next())
        .ok_or(ExtractError::MissingTitleRegion)?;

    let title = heading.text().collect::<String>().trim().to_string();
    if title.is_empty() {
        return Err(ExtractError::EmptyTitle);
    }
    Ok(title)
}
