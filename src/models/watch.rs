//! Request-level filter parameters: watch-set, filter mode and compact code scheme.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Slug prefixes a client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSet {
    /// No slug filtering at all (`watch=all`).
    All,
    /// Ordered, lower-cased slug prefixes.
    Prefixes(Vec<String>),
}

impl WatchSet {
    /// Build a prefix watch-set, normalizing each prefix.
    pub fn prefixes<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Prefixes(
            items
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Resolve the `watch` query parameter.
    ///
    /// Omitted, blank or all-empty lists fall back to `default`.
    pub fn from_query(raw: Option<&str>, default: &WatchSet) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return default.clone();
        };
        if raw.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        match Self::prefixes(raw.split(',')) {
            Self::Prefixes(list) if list.is_empty() => default.clone(),
            set => set,
        }
    }

    /// Whether some member is a case-insensitive prefix of `slug`.
    pub fn matches(&self, slug: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefixes(list) => {
                let slug = slug.to_lowercase();
                list.iter().any(|prefix| slug.starts_with(prefix.as_str()))
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Which relevance rule a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Slug match plus upcoming-or-recent gate.
    #[default]
    Recent,
    /// Slug match only, no recency gate (historical "filterByWatchlist").
    Watchlist,
}

impl FromStr for FilterMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "watchlist" => Ok(Self::Watchlist),
            other => Err(AppError::validation(format!("unknown filter mode '{other}'"))),
        }
    }
}

/// How the compact shape encodes the upcoming flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeScheme {
    /// 1 = upcoming, 0 = otherwise.
    #[default]
    Binary,
    /// 1 = upcoming, 2 = recently released, 0 = otherwise.
    Tristate,
}

impl FromStr for CodeScheme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "tristate" => Ok(Self::Tristate),
            other => Err(AppError::validation(format!("unknown code scheme '{other}'"))),
        }
    }
}
