//! Image reference normalization.
//!
//! Catalog files reference pictures in several ways: a bare filename, a
//! repository page link or a direct link. Everything is rewritten to one
//! directly fetchable URL, or to the empty string when nothing usable is
//! found. The rules are tried top to bottom and the first match wins.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::DEFAULT_IMAGE_BASE_URL;

const RAW_HOST: &str = "https://raw.githubusercontent.com";
const RAW_BRANCH: &str = "main";

/// What to do with a reference once its rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
    /// Already fetchable as is.
    Keep,
    /// `github.com/<owner>/<repo>/blob/<branch>/<path>` → raw content on `main`.
    RawContent,
    /// Bare filename served from the configured base URL.
    PrefixBase,
}

lazy_static! {
    static ref RULES: Vec<(Regex, Rewrite)> = vec![
        (
            Regex::new(r"^https?://raw\.githubusercontent\.com/\S+$").unwrap(),
            Rewrite::Keep,
        ),
        (
            Regex::new(
                r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/\s]+)/(?:blob|raw)/[^/\s]+/(\S+)$"
            )
            .unwrap(),
            Rewrite::RawContent,
        ),
        (
            Regex::new(r"^https?://[^\s/?#]+\S*$").unwrap(),
            Rewrite::Keep,
        ),
        (
            Regex::new(r"(?i)^[^\s/\\:?#]+\.(?:png|jpe?g|gif)$").unwrap(),
            Rewrite::PrefixBase,
        ),
    ];
}

/// Rewrites image references against a fixed base URL.
#[derive(Debug, Clone)]
pub struct ImageUrlNormalizer {
    base_url: String,
}

impl Default for ImageUrlNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageUrlNormalizer {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Map one reference to a direct URL or `""`. Never fails.
    pub fn normalize(&self, reference: &str) -> String {
        let reference = reference.trim();
        if reference.is_empty() {
            return String::new();
        }

        for (pattern, rewrite) in RULES.iter() {
            if let Some(caps) = pattern.captures(reference) {
                return self.apply(*rewrite, reference, &caps);
            }
        }
        String::new()
    }

    fn apply(&self, rewrite: Rewrite, reference: &str, caps: &Captures<'_>) -> String {
        match rewrite {
            Rewrite::Keep => reference.to_string(),
            Rewrite::RawContent => format!(
                "{RAW_HOST}/{}/{}/{RAW_BRANCH}/{}",
                &caps[1], &caps[2], &caps[3]
            ),
            Rewrite::PrefixBase => {
                if self.base_url.is_empty() {
                    // Without a base the filename is not fetchable.
                    String::new()
                } else {
                    format!("{}/{reference}", self.base_url)
                }
            }
        }
    }
}

/// [`ImageUrlNormalizer::normalize`] with the default image base URL.
pub fn normalize(reference: &str) -> String {
    ImageUrlNormalizer::default().normalize(reference)
}

/// Split a `;`-separated image field into trimmed, non-empty references.
pub fn split_image_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_filename_gets_base_url() {
        assert_eq!(
            normalize("laptop1.png"),
            format!("{DEFAULT_IMAGE_BASE_URL}laptop1.png")
        );
        let n = ImageUrlNormalizer::new("https://img.example.com/laptops/");
        assert_eq!(n.normalize("X1.JPEG"), "https://img.example.com/laptops/X1.JPEG");
        assert_eq!(n.normalize("  pic.gif "), "https://img.example.com/laptops/pic.gif");
    }

    #[test]
    fn repository_page_link_becomes_raw_content() {
        assert_eq!(
            normalize("https://github.com/o/r/blob/main/img/x.png"),
            "https://raw.githubusercontent.com/o/r/main/img/x.png"
        );
        assert_eq!(
            normalize("https://github.com/o/r/raw/dev/a/b/c.jpg"),
            "https://raw.githubusercontent.com/o/r/main/a/b/c.jpg"
        );
    }

    #[test]
    fn direct_links_are_unchanged() {
        let raw = "https://raw.githubusercontent.com/o/r/main/img/x.png";
        assert_eq!(normalize(raw), raw);
        let cdn = "http://cdn.example.com/p/123?size=large";
        assert_eq!(normalize(cdn), cdn);
    }

    #[test]
    fn unusable_references_become_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("not a url"), "");
        assert_eq!(normalize("ftp://example.com/x.png"), "");
        assert_eq!(normalize("laptop1.bmp"), "");
        assert_eq!(normalize("images/laptop1.png"), "");
        assert_eq!(normalize("https://"), "");
    }

    #[test]
    fn empty_base_never_yields_a_bare_filename() {
        let n = ImageUrlNormalizer::new("");
        assert_eq!(n.normalize("laptop1.png"), "");
    }

    #[test]
    fn image_list_drops_blank_fragments() {
        assert_eq!(
            split_image_list(" a.png ; ;b.jpg;"),
            vec!["a.png".to_string(), "b.jpg".to_string()]
        );
        assert!(split_image_list("").is_empty());
    }
}
