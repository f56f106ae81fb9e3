// src/models/selectors.rs

//! CSS selectors for scraping the latest-updates page.

use serde::{Deserialize, Serialize};

/// Structural signatures of one "series update card".
///
/// The defaults track the current markup of the source page. They are
/// expected to need re-tuning whenever the page's layout classes change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSelectors {
    /// Selector for each update card
    #[serde(default = "defaults::card")]
    pub card_selector: String,

    /// Selector for the text column inside a card (not the thumbnail column)
    #[serde(default = "defaults::text_column")]
    pub text_column_selector: String,

    /// Selector for candidate title anchors within the text column
    #[serde(default = "defaults::title_link")]
    pub title_link_selector: String,

    /// Selector for each chapter row within the text column
    #[serde(default = "defaults::row")]
    pub row_selector: String,

    /// Selector for the chapter anchor within a row
    #[serde(default = "defaults::chapter_link")]
    pub chapter_link_selector: String,

    /// Selector for the chapter label within the chapter anchor
    #[serde(default = "defaults::chapter_label")]
    pub chapter_label_selector: String,

    /// Selector for the relative-time element within a row
    #[serde(default = "defaults::time")]
    pub time_selector: String,

    /// Path prefix of series pages; stripped to obtain the slug
    #[serde(default = "defaults::series_path")]
    pub series_path: String,

    /// Substring every chapter link path must contain
    #[serde(default = "defaults::chapter_marker")]
    pub chapter_marker: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "defaults::attr_name")]
    pub attr_name: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card_selector: defaults::card(),
            text_column_selector: defaults::text_column(),
            title_link_selector: defaults::title_link(),
            row_selector: defaults::row(),
            chapter_link_selector: defaults::chapter_link(),
            chapter_label_selector: defaults::chapter_label(),
            time_selector: defaults::time(),
            series_path: defaults::series_path(),
            chapter_marker: defaults::chapter_marker(),
            attr_name: defaults::attr_name(),
        }
    }
}

impl CardSelectors {
    /// All selector strings paired with their config key, for validation.
    pub fn selector_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("card_selector", &self.card_selector),
            ("text_column_selector", &self.text_column_selector),
            ("title_link_selector", &self.title_link_selector),
            ("row_selector", &self.row_selector),
            ("chapter_link_selector", &self.chapter_link_selector),
            ("chapter_label_selector", &self.chapter_label_selector),
            ("time_selector", &self.time_selector),
        ]
    }
}

mod defaults {
    pub fn card() -> String {
        "div.grid.grid-rows-1.grid-cols-12".into()
    }
    pub fn text_column() -> String {
        "div.col-span-9".into()
    }
    pub fn title_link() -> String {
        "a[href]".into()
    }
    pub fn row() -> String {
        "div.flex.flex-row.justify-between".into()
    }
    pub fn chapter_link() -> String {
        "a[href]".into()
    }
    pub fn chapter_label() -> String {
        "p.chapter-label".into()
    }
    pub fn time() -> String {
        "p.flex-end".into()
    }
    pub fn series_path() -> String {
        "/series/".into()
    }
    pub fn chapter_marker() -> String {
        "/chapter/".into()
    }
    pub fn attr_name() -> String {
        "href".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let selectors: CardSelectors = toml::from_str(r#"card_selector = "li.card""#).unwrap();
        assert_eq!(selectors.card_selector, "li.card");
        assert_eq!(selectors.series_path, "/series/");
        assert_eq!(selectors.attr_name, "href");
    }
}
