use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::models::FieldMap;

/// Turns rendered page content into named fields.
///
/// Implementations must be deterministic for a given input: either a
/// field map or a typed failure, decided from the content alone.
pub trait FieldExtractor {
    fn extract(&self, html: &str) -> Result<FieldMap>;
}

/// Field extractor for trivia-archive game pages.
///
/// `#game_title` anchors the page; when it is missing the content is not
/// a game page and extraction fails. Everything else is optional.
pub struct GamePageExtractor {
    title_selector: Selector,
    comments_selector: Selector,
    category_selector: Selector,
    show_pattern: Regex,
}

impl GamePageExtractor {
    pub fn new() -> Self {
        Self {
            title_selector: Selector::parse("#game_title").unwrap(),
            comments_selector: Selector::parse("#game_comments").unwrap(),
            category_selector: Selector::parse(".category_name").unwrap(),
            show_pattern: Regex::new(r"Show #(\d+) - (.+)").unwrap(),
        }
    }
}

impl FieldExtractor for GamePageExtractor {
    fn extract(&self, html: &str) -> Result<FieldMap> {
        let doc = Html::parse_document(html);

        let title = doc
            .select(&self.title_selector)
            .next()
            .map(|e| element_text(&e))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Extract("missing #game_title".to_string()))?;

        let mut fields = FieldMap::new();
        if let Some(caps) = self.show_pattern.captures(&title) {
            fields.insert("show_number".to_string(), caps[1].to_string());
            fields.insert("air_date".to_string(), caps[2].trim().to_string());
        }
        fields.insert("title".to_string(), title);

        if let Some(comments) = doc.select(&self.comments_selector).next() {
            let text = element_text(&comments);
            if !text.is_empty() {
                fields.insert("comments".to_string(), text);
            }
        }

        let categories: Vec<String> = doc
            .select(&self.category_selector)
            .map(|e| element_text(&e))
            .filter(|c| !c.is_empty())
            .collect();
        if !categories.is_empty() {
            fields.insert("categories".to_string(), categories.join("; "));
        }

        Ok(fields)
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
