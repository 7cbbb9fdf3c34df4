use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::OratioError;

use super::language::{Language, LanguageService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrayerCategory {
    Morning,
    Basic,
    Evening,
    Devotion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PrayerCategory,
}

const fn prayer(id: &'static str, name: &'static str, category: PrayerCategory) -> Prayer {
    Prayer { id, name, category }
}

const DAILY_PRAYERS: [Prayer; 6] = [
    prayer("morning_offering", "Morning Offering", PrayerCategory::Morning),
    prayer("our_father", "Our Father", PrayerCategory::Basic),
    prayer("hail_mary", "Hail Mary", PrayerCategory::Basic),
    prayer("glory_be", "Glory Be", PrayerCategory::Basic),
    prayer("evening_prayer", "Evening Prayer", PrayerCategory::Evening),
    prayer("act_of_contrition", "Act of Contrition", PrayerCategory::Evening),
];

const DEVOTIONS: [Prayer; 3] = [
    prayer("angelus", "The Angelus", PrayerCategory::Devotion),
    prayer("divine_mercy", "Divine Mercy Chaplet", PrayerCategory::Devotion),
    prayer("stations_cross", "Stations of the Cross", PrayerCategory::Devotion),
];

/// Built-in prayers plus which of them were prayed in this run.
pub struct PrayerCatalog {
    prayers: Vec<Prayer>,
    completed: BTreeSet<&'static str>,
}

impl Default for PrayerCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PrayerCatalog {
    pub fn new() -> Self {
        Self {
            prayers: DAILY_PRAYERS.into_iter().chain(DEVOTIONS).collect(),
            completed: BTreeSet::new(),
        }
    }

    pub fn all(&self) -> &[Prayer] {
        &self.prayers
    }

    pub fn daily(&self) -> Vec<&Prayer> {
        self.prayers
            .iter()
            .filter(|p| p.category != PrayerCategory::Devotion)
            .collect()
    }

    pub fn by_category(&self, category: PrayerCategory) -> Vec<&Prayer> {
        self.prayers.iter().filter(|p| p.category == category).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Prayer> {
        self.prayers.iter().find(|p| p.id == id)
    }

    /// Marks a prayer as prayed. Returns whether it was newly marked.
    pub fn mark_completed(&mut self, id: &str) -> Result<bool, OratioError> {
        let prayer = self.get(id).ok_or_else(|| OratioError::NotFound {
            kind: "prayer",
            id: id.to_string(),
        })?;
        let id = prayer.id;
        Ok(self.completed.insert(id))
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// Completed prayers in catalog order.
    pub fn completed(&self) -> Vec<&Prayer> {
        self.prayers
            .iter()
            .filter(|p| self.completed.contains(p.id))
            .collect()
    }

    pub fn clear_completed(&mut self) {
        self.completed.clear();
    }

    pub fn prayer_text(&self, prayer: &Prayer, language: Language, texts: &LanguageService) -> String {
        match texts.lookup(prayer.id, language) {
            Some(text) => text.to_string(),
            None => format!(
                "Prayer text not available.\n\nPlease ensure the prayer file for {language} is properly configured."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::resources::MemoryResourceLoader;

    #[test]
    fn daily_list_excludes_devotions() {
        let catalog = PrayerCatalog::new();
        let daily: Vec<&str> = catalog.daily().iter().map(|p| p.id).collect();

        assert_eq!(daily.len(), 6);
        assert!(!daily.contains(&"angelus"));
        assert_eq!(catalog.all().len(), 9);
        assert_eq!(catalog.by_category(PrayerCategory::Evening).len(), 2);
    }

    #[test]
    fn missing_text_produces_guidance() {
        let texts = LanguageService::load(
            &MemoryResourceLoader::new().with("prayers_english.txt", "hail_mary\nHail Mary, full of grace"),
        );
        let catalog = PrayerCatalog::new();

        let hail_mary = catalog.get("hail_mary").unwrap();
        assert_eq!(
            catalog.prayer_text(hail_mary, Language::Latin, &texts),
            "Hail Mary, full of grace"
        );

        let angelus = catalog.get("angelus").unwrap();
        let text = catalog.prayer_text(angelus, Language::Tagalog, &texts);
        assert!(text.starts_with("Prayer text not available."));
        assert!(text.contains("Tagalog"));
    }

    #[test]
    fn tracks_completed_prayers() {
        let mut catalog = PrayerCatalog::new();
        assert!(catalog.completed().is_empty());

        assert_eq!(catalog.mark_completed("glory_be"), Ok(true));
        assert_eq!(catalog.mark_completed("our_father"), Ok(true));
        assert_eq!(catalog.mark_completed("glory_be"), Ok(false));
        assert_eq!(
            catalog.mark_completed("rosary_of_everything"),
            Err(OratioError::NotFound {
                kind: "prayer",
                id: "rosary_of_everything".into()
            })
        );

        let ids: Vec<&str> = catalog.completed().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["our_father", "glory_be"]);
        assert!(catalog.is_completed("glory_be"));
        assert!(!catalog.is_completed("hail_mary"));

        catalog.clear_completed();
        assert!(!catalog.is_completed("glory_be"));
    }
}
