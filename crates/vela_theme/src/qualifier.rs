//! Qualifier tags
//!
//! Entry keys in a theme spec are `-`-separated tag lists in the style of
//! Android resource qualifiers: `sw600-land`, `ldrtl`, `dark-port`. A tag either
//! names a built-in condition or a value supplied through the override map.

use smallvec::SmallVec;

/// Landscape orientation tag
pub const LAND: &str = "land";
/// Portrait orientation tag
pub const PORT: &str = "port";
/// Left-to-right layout direction tag
pub const LDLTR: &str = "ldltr";
/// Right-to-left layout direction tag
pub const LDRTL: &str = "ldrtl";

/// Prefix of smallest-width breakpoint tags (`sw600`)
const BREAKPOINT_PREFIX: &str = "sw";

/// Keys that apply unconditionally
const BASE_KEYS: [&str; 2] = ["base", "default"];

const TAG_SEPARATOR: char = '-';

/// Normalize a tag or key for comparison.
///
/// - Trims whitespace.
/// - Lowercases ASCII (`Land` and `LAND` both mean `land`).
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Parse a smallest-width tag into its threshold.
///
/// Only `sw` followed by ASCII digits with a positive value qualifies;
/// anything else (`sw`, `sw-1`, `sw0`, `swx`, overflow) is not a breakpoint.
pub fn parse_breakpoint(tag: &str) -> Option<u32> {
    let digits = tag.strip_prefix(BREAKPOINT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|threshold| *threshold > 0)
}

/// A parsed entry key: the original spelling plus its normalized tags
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qualifier {
    key: String,
    tags: SmallVec<[String; 4]>,
}

impl Qualifier {
    pub fn parse(key: &str) -> Self {
        let normalized = normalize_tag(key);
        let tags = if BASE_KEYS.contains(&normalized.as_str()) {
            SmallVec::new()
        } else {
            normalized
                .split(TAG_SEPARATOR)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_owned)
                .collect()
        };

        Self {
            key: key.to_owned(),
            tags,
        }
    }

    /// The key as written in the spec
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Normalized tags; empty for unqualified keys
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Applies regardless of conditions
    pub fn is_unqualified(&self) -> bool {
        self.tags.is_empty()
    }

    /// Breakpoint tags carried by this key, with their thresholds, in key order
    pub fn breakpoints(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.tags
            .iter()
            .filter_map(|tag| parse_breakpoint(tag).map(|threshold| (tag.as_str(), threshold)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_breakpoint() {
        assert_eq!(parse_breakpoint("sw600"), Some(600));
        assert_eq!(parse_breakpoint("sw1"), Some(1));
        assert_eq!(parse_breakpoint("sw"), None);
        assert_eq!(parse_breakpoint("sw0"), None);
        assert_eq!(parse_breakpoint("sw-600"), None);
        assert_eq!(parse_breakpoint("sw+600"), None);
        assert_eq!(parse_breakpoint("sw600dp"), None);
        assert_eq!(parse_breakpoint("w600"), None);
        assert_eq!(parse_breakpoint("sw99999999999"), None);
    }

    #[test]
    fn test_base_keys_are_unqualified() {
        for key in ["base", "default", "Base", "  DEFAULT ", ""] {
            assert!(Qualifier::parse(key).is_unqualified(), "key={key:?}");
        }
    }

    #[test]
    fn test_compound_key_tags() {
        let q = Qualifier::parse("SW600-Land");
        assert_eq!(q.key(), "SW600-Land");
        assert_eq!(q.tags(), ["sw600", "land"]);
        assert!(!q.is_unqualified());
    }

    #[test]
    fn test_empty_segments_dropped() {
        let q = Qualifier::parse("dark--port-");
        assert_eq!(q.tags(), ["dark", "port"]);
    }

    #[test]
    fn test_breakpoints_in_key_order() {
        let q = Qualifier::parse("sw800-land-sw600-swx");
        let found: Vec<_> = q.breakpoints().collect();
        assert_eq!(found, vec![("sw800", 800), ("sw600", 600)]);
    }
}
