use std::collections::HashMap;
use std::path::Path;

use crate::key::{normalize_lang, normalize_text};

/// Known-good translations that win over cache and network.
///
/// Keyed by exact (trimmed) source text, then by target language.
#[derive(Debug, Clone, Default)]
pub struct StaticOverrides {
    entries: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid override table: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}

impl StaticOverrides {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the directory app's fixed labels
    pub fn with_defaults() -> Self {
        let mut table = Self::new();

        // (text, hindi, marathi)
        let labels = [
            ("Home", "होम", "मुख्यपृष्ठ"),
            ("Categories", "श्रेणियाँ", "श्रेणी"),
            ("Vendors", "विक्रेता", "विक्रेते"),
            ("Profile", "प्रोफ़ाइल", "प्रोफाइल"),
            ("Login", "लॉगिन", "लॉगिन"),
            ("Logout", "लॉगआउट", "लॉगआउट"),
            ("Search", "खोजें", "शोधा"),
            ("Settings", "सेटिंग्स", "सेटिंग्ज"),
            ("Language", "भाषा", "भाषा"),
            ("Submit", "जमा करें", "सबमिट करा"),
            ("Cancel", "रद्द करें", "रद्द करा"),
            ("Verify OTP", "ओटीपी सत्यापित करें", "ओटीपी सत्यापित करा"),
            ("Call", "कॉल करें", "कॉल करा"),
            ("Directions", "दिशा-निर्देश", "दिशा"),
        ];

        for (text, hi, mr) in labels {
            table.insert(text, "hi", hi);
            table.insert(text, "mr", mr);
        }

        table
    }

    /// Merge a JSON table (`{"text": {"lang": "translation"}}`) over the defaults
    pub fn load_from_file(path: &Path) -> Result<Self, OverrideError> {
        let content = std::fs::read_to_string(path)?;
        let extra: HashMap<String, HashMap<String, String>> = serde_json::from_str(&content)?;

        let mut table = Self::with_defaults();
        for (text, per_lang) in extra {
            for (lang, value) in per_lang {
                table.insert(&text, &lang, &value);
            }
        }

        tracing::info!("Loaded {} override texts from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn insert(&mut self, text: &str, target: &str, translation: &str) {
        self.entries
            .entry(normalize_text(text).to_string())
            .or_default()
            .insert(normalize_lang(target), translation.to_string());
    }

    pub fn lookup(&self, text: &str, target: &str) -> Option<&str> {
        self.entries
            .get(normalize_text(text))?
            .get(&normalize_lang(target))
            .map(String::as_str)
    }

    /// Number of distinct source texts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_per_target_language() {
        let table = StaticOverrides::with_defaults();
        assert_eq!(table.lookup("Home", "hi"), Some("होम"));
        assert_eq!(table.lookup("Home", "MR"), Some("मुख्यपृष्ठ"));
        assert_eq!(table.lookup("Home", "ta"), None);
    }

    #[test]
    fn lookup_matches_exact_text_only() {
        let table = StaticOverrides::with_defaults();
        assert_eq!(table.lookup(" Home ", "hi"), Some("होम"));
        assert_eq!(table.lookup("home", "hi"), None);
        assert_eq!(table.lookup("Home page", "hi"), None);
    }

    #[test]
    fn file_entries_merge_over_defaults() {
        let dir = std::env::temp_dir().join(format!("lingo-overrides-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("overrides.json");
        std::fs::write(&path, r#"{"Home":{"hi":"मुखपृष्ठ"},"Plumber":{"ta":"குழாய்த் தொழிலாளி"}}"#)
            .unwrap();

        let table = StaticOverrides::load_from_file(&path).unwrap();
        assert_eq!(table.lookup("Home", "hi"), Some("मुखपृष्ठ"));
        assert_eq!(table.lookup("Home", "mr"), Some("मुख्यपृष्ठ"));
        assert_eq!(table.lookup("Plumber", "ta"), Some("குழாய்த் தொழிலாளி"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("lingo-overrides-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("overrides.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            StaticOverrides::load_from_file(&path),
            Err(OverrideError::InvalidFormat(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
