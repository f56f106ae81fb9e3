//! Utility functions and helpers.

pub mod http;
pub mod text;
pub mod time;

use url::Url;

/// Percent-decoded path component of `href` once resolved against `base`.
///
/// Relative and absolute links to the same page yield the same path.
pub fn link_path(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href.trim()).ok()?;
    let path = url.path();
    Some(
        urlencoding::decode(path)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| path.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_path() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            link_path(&base, "/series/nano-machine-abc123"),
            Some("/series/nano-machine-abc123".to_string())
        );
        assert_eq!(
            link_path(&base, "https://example.com/series/a-b?x=1"),
            Some("/series/a-b".to_string())
        );
        assert_eq!(
            link_path(&base, "series/relative"),
            Some("/series/relative".to_string())
        );
    }

    #[test]
    fn test_link_path_decodes_non_ascii_and_spaces() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            link_path(&base, "/series/나노-마신 abc"),
            Some("/series/나노-마신 abc".to_string())
        );
        assert_eq!(
            link_path(&base, "/series/%EB%82%98%EB%85%B8-%EB%A7%88%EC%8B%A0"),
            Some("/series/나노-마신".to_string())
        );
    }

    #[test]
    fn test_link_path_keeps_invalid_utf8_encoded() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(link_path(&base, "/series/%FF"), Some("/series/%FF".to_string()));
    }
}
