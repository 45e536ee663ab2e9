use std::fmt;

use serde::{Deserialize, Serialize};

const SEPARATOR: &str = "::";

/// Cache and dedup key for one logical translation request.
///
/// Built from the trimmed text followed by the lowercased source and target
/// codes. Colons in language codes are replaced, so the codes are always the
/// last two colon-free segments and the text is whatever precedes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(text: &str, source: &str, target: &str) -> Self {
        CacheKey(format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            normalize_text(text),
            normalize_lang(source),
            normalize_lang(target)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize_text(text: &str) -> &str {
    text.trim()
}

pub fn normalize_lang(code: &str) -> String {
    code.trim().to_lowercase().replace(':', "_")
}

/// Case-insensitive language comparison
pub fn same_language(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_inside_language_codes_keeps_keys_apart() {
        let a = CacheKey::new("a", "b::c", "d");
        let b = CacheKey::new("a::b", "c", "d");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "a::b__c::d");
        assert_eq!(b.as_str(), "a::b::c::d");
    }

    #[test]
    fn key_is_stable_and_normalized() {
        let a = CacheKey::new("  Hello ", "EN", "Hi");
        let b = CacheKey::new("Hello", "en", "hi");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Hello::en::hi");
    }

    #[test]
    fn direction_and_text_case_matter() {
        assert_ne!(
            CacheKey::new("Hello", "en", "hi"),
            CacheKey::new("Hello", "hi", "en")
        );
        assert_ne!(
            CacheKey::new("Hello", "en", "hi"),
            CacheKey::new("hello", "en", "hi")
        );
    }

    #[test]
    fn separator_inside_text_keeps_languages_apart() {
        let hi = CacheKey::new("Price::Rs", "en", "hi");
        let mr = CacheKey::new("Price::Rs", "en", "mr");
        assert_ne!(hi, mr);
        assert!(hi.as_str().ends_with("::en::hi"));
    }

    #[test]
    fn same_language_ignores_case() {
        assert!(same_language("HI", "hi"));
        assert!(same_language(" en", "EN "));
        assert!(!same_language("en", "hi"));
    }
}
