use std::{collections::HashMap, fmt, str::FromStr};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::OratioError;

use super::resources::{parse_sections, ResourceLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Tagalog,
    Latin,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Tagalog, Language::Latin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tagalog => "Tagalog",
            Language::Latin => "Latin",
        }
    }

    /// Lower-case form used in resource file names (`prayers_latin.txt`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Tagalog => "tagalog",
            Language::Latin => "latin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = OratioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| OratioError::UnknownLanguage(value.to_string()))
    }
}

const TRANSLATION_SOURCES: [&str; 3] = ["prayers", "rosary", "psalms"];

/// Translation table for every supported language plus the user's current
/// choice. Lookups fall back to English, then to the key itself.
pub struct LanguageService {
    current: Language,
    translations: HashMap<Language, HashMap<String, String>>,
}

impl LanguageService {
    pub fn load(loader: &dyn ResourceLoader) -> Self {
        let mut translations = HashMap::new();

        for language in Language::ALL {
            let mut table = HashMap::new();
            for source in TRANSLATION_SOURCES {
                let name = format!("{source}_{}.txt", language.file_stem());
                if let Some(content) = loader.load(&name) {
                    table.extend(parse_sections(&content));
                }
            }
            info!("Loaded {} translations for {}", table.len(), language);
            translations.insert(language, table);
        }

        Self {
            current: Language::default(),
            translations,
        }
    }

    pub fn current_language(&self) -> Language {
        self.current
    }

    pub fn set_language(&mut self, language: Language) {
        self.current = language;
    }

    /// Accepts a language by display name; unsupported names leave the
    /// current language untouched.
    pub fn set_language_by_name(&mut self, name: &str) -> Result<Language, OratioError> {
        let language = name.parse::<Language>()?;
        self.current = language;
        Ok(language)
    }

    /// Text for `key` in `language`, falling back to English.
    pub fn lookup(&self, key: &str, language: Language) -> Option<&str> {
        self.translations
            .get(&language)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.translations
                    .get(&Language::English)
                    .and_then(|table| table.get(key))
            })
            .map(String::as_str)
    }

    pub fn translate_in(&self, key: &str, language: Language) -> String {
        self.lookup(key, language).unwrap_or(key).to_string()
    }

    pub fn translate(&self, key: &str) -> String {
        self.translate_in(key, self.current)
    }

    /// Keys defined directly for `language`, without the English fallback.
    pub fn keys(&self, language: Language) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .translations
            .get(&language)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }
}
