use serde::Serialize;

use super::language::{Language, LanguageService};

pub const PSALM_COUNT: u32 = 150;

const COMMON_TITLES: [(u32, &str); 10] = [
    (23, "The Lord is My Shepherd"),
    (51, "Create in Me a Clean Heart"),
    (150, "Praise the Lord"),
    (130, "Out of the Depths"),
    (27, "The Lord is My Light"),
    (136, "Give Thanks to the Lord"),
    (103, "Bless the Lord, O My Soul"),
    (84, "How Lovely is Your Dwelling Place"),
    (24, "The Earth is the Lord's"),
    (121, "I Will Lift Up My Eyes"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Psalm {
    pub number: u32,
    pub title: String,
}

impl Psalm {
    fn text_key(&self) -> String {
        format!("psalm_{}", self.number)
    }

    fn title_key(&self) -> String {
        format!("psalm_{}_title", self.number)
    }
}

/// Psalms 1 through 150, ordered by number. The psalm number doubles as the
/// highlight document key.
pub struct PsalmCatalog {
    psalms: Vec<Psalm>,
}

impl Default for PsalmCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PsalmCatalog {
    pub fn new() -> Self {
        let psalms = (1..=PSALM_COUNT)
            .map(|number| {
                let title = COMMON_TITLES
                    .iter()
                    .find(|(n, _)| *n == number)
                    .map(|(_, title)| title.to_string())
                    .unwrap_or_else(|| format!("Psalm {number}"));
                Psalm { number, title }
            })
            .collect();
        Self { psalms }
    }

    pub fn all(&self) -> &[Psalm] {
        &self.psalms
    }

    pub fn get(&self, number: u32) -> Option<&Psalm> {
        number
            .checked_sub(1)
            .and_then(|index| self.psalms.get(index as usize))
    }

    pub fn title(&self, psalm: &Psalm, language: Language, texts: &LanguageService) -> String {
        texts
            .lookup(&psalm.title_key(), language)
            .map(str::to_string)
            .unwrap_or_else(|| psalm.title.clone())
    }

    pub fn text(&self, psalm: &Psalm, language: Language, texts: &LanguageService) -> Option<String> {
        texts.lookup(&psalm.text_key(), language).map(str::to_string)
    }

    /// Case-insensitive match against the localized title and text.
    pub fn search(&self, keyword: &str, language: Language, texts: &LanguageService) -> Vec<&Psalm> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return self.psalms.iter().collect();
        }

        self.psalms
            .iter()
            .filter(|psalm| {
                let title = self.title(psalm, language, texts).to_lowercase();
                let text = self
                    .text(psalm, language, texts)
                    .unwrap_or_default()
                    .to_lowercase();
                title.contains(&needle) || text.contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::resources::MemoryResourceLoader;

    fn texts() -> LanguageService {
        LanguageService::load(&MemoryResourceLoader::new().with(
            "psalms_english.txt",
            "psalm_1\nBlessed is the man\n===\npsalm_1_title\nThe Way of the Righteous\n===\npsalm_23\nThe Lord is my shepherd; I shall not want.",
        ))
    }

    #[test]
    fn lists_all_psalms_in_order() {
        let catalog = PsalmCatalog::new();
        assert_eq!(catalog.all().len(), 150);
        assert_eq!(catalog.all()[0].number, 1);
        assert_eq!(catalog.get(150).map(|p| p.title.as_str()), Some("Praise the Lord"));
        assert_eq!(catalog.get(2).map(|p| p.title.as_str()), Some("Psalm 2"));
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(151).is_none());
    }

    #[test]
    fn titles_prefer_translations() {
        let catalog = PsalmCatalog::new();
        let texts = texts();

        let first = catalog.get(1).unwrap();
        assert_eq!(catalog.title(first, Language::Latin, &texts), "The Way of the Righteous");

        let shepherd = catalog.get(23).unwrap();
        assert_eq!(catalog.title(shepherd, Language::English, &texts), "The Lord is My Shepherd");
        assert!(catalog.text(catalog.get(42).unwrap(), Language::English, &texts).is_none());
    }

    #[test]
    fn search_covers_title_and_text() {
        let catalog = PsalmCatalog::new();
        let texts = texts();

        let by_text: Vec<u32> = catalog
            .search("SHEPHERD", Language::English, &texts)
            .iter()
            .map(|p| p.number)
            .collect();
        assert_eq!(by_text, vec![23]);

        let by_title: Vec<u32> = catalog
            .search("depths", Language::English, &texts)
            .iter()
            .map(|p| p.number)
            .collect();
        assert_eq!(by_title, vec![130]);

        assert!(catalog.search("zzz", Language::English, &texts).is_empty());
    }
}
