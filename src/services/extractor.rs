// src/services/extractor.rs

//! Update-card extractor.
//!
//! Turns the latest-updates page into one [`Entry`] per series card using
//! the configured [`CardSelectors`]. Cards that do not match the expected
//! shape are skipped, never reported as errors.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CardSelectors, Entry};
use crate::utils::link_path;
use crate::utils::text::{normalize_whitespace, strip_markup};

/// Compiled selectors for one version of the source page markup.
#[derive(Debug, Clone)]
pub struct CardExtractor {
    card: Selector,
    text_column: Selector,
    title_link: Selector,
    row: Selector,
    chapter_link: Selector,
    chapter_label: Selector,
    time: Selector,
    series_path: String,
    chapter_marker: String,
    attr_name: String,
    base_url: Url,
}

impl CardExtractor {
    /// Compile the selectors; links are resolved against `base_url`.
    pub fn new(selectors: &CardSelectors, base_url: &str) -> Result<Self> {
        Ok(Self {
            card: Self::parse_selector(&selectors.card_selector)?,
            text_column: Self::parse_selector(&selectors.text_column_selector)?,
            title_link: Self::parse_selector(&selectors.title_link_selector)?,
            row: Self::parse_selector(&selectors.row_selector)?,
            chapter_link: Self::parse_selector(&selectors.chapter_link_selector)?,
            chapter_label: Self::parse_selector(&selectors.chapter_label_selector)?,
            time: Self::parse_selector(&selectors.time_selector)?,
            series_path: selectors.series_path.clone(),
            chapter_marker: selectors.chapter_marker.clone(),
            attr_name: selectors.attr_name.clone(),
            base_url: Url::parse(base_url)?,
        })
    }

    /// Extract entries in page order, at most one per series.
    pub fn extract(&self, html: &str) -> Vec<Entry> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (index, card) in document.select(&self.card).enumerate() {
            match self.parse_card(card) {
                Some(entry) if seen.insert(entry.slug.clone()) => entries.push(entry),
                Some(entry) => log::debug!("Card {index}: duplicate series '{}'", entry.slug),
                None => log::debug!("Card {index}: no title or chapter row, skipped"),
            }
        }
        entries
    }

    /// Number of nodes matching the card signature, for diagnostics.
    pub fn count_cards(&self, html: &str) -> usize {
        Html::parse_document(html).select(&self.card).count()
    }

    fn parse_card(&self, card: ElementRef) -> Option<Entry> {
        let column = card.select(&self.text_column).next()?;
        let (title, slug) = self.find_title(column)?;
        let (row, link) = self.find_latest_row(column)?;

        let label = row
            .select(&self.chapter_label)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| normalize_whitespace(&link.text().collect::<String>()));

        let time = row
            .select(&self.time)
            .next()
            .map(|el| strip_markup(&el.inner_html()))
            .unwrap_or_default();

        Some(Entry::new(title, slug, label, time))
    }

    /// The first series link with visible text; thumbnail links wrap only an image.
    fn find_title(&self, column: ElementRef) -> Option<(String, String)> {
        column.select(&self.title_link).find_map(|anchor| {
            let path = self.href_path(anchor)?;
            if path.contains(&self.chapter_marker) {
                return None;
            }
            let slug = path.strip_prefix(&self.series_path)?.trim();
            let title = normalize_whitespace(&anchor.text().collect::<String>());
            if slug.is_empty() || title.is_empty() {
                return None;
            }
            Some((title, slug.to_string()))
        })
    }

    /// The first row holding a chapter link; later rows are older chapters.
    fn find_latest_row<'a>(
        &self,
        column: ElementRef<'a>,
    ) -> Option<(ElementRef<'a>, ElementRef<'a>)> {
        column.select(&self.row).find_map(|row| {
            row.select(&self.chapter_link)
                .find(|anchor| {
                    self.href_path(*anchor)
                        .is_some_and(|path| path.contains(&self.chapter_marker))
                })
                .map(|anchor| (row, anchor))
        })
    }

    fn href_path(&self, anchor: ElementRef) -> Option<String> {
        let href = anchor.value().attr(&self.attr_name)?;
        link_path(&self.base_url, href)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
