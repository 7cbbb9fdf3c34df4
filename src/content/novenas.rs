use serde::Serialize;

use super::{language::Language, resources::ResourceLoader};

pub const NOVENA_DAYS: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Novena {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub duration_days: u32,
}

const fn novena(id: &'static str, name: &'static str, description: &'static str) -> Novena {
    Novena {
        id,
        name,
        description,
        duration_days: NOVENA_DAYS,
    }
}

const NOVENAS: [Novena; 9] = [
    novena(
        "sacred_heart",
        "Sacred Heart of Jesus",
        "A powerful novena to the Sacred Heart of Jesus for spiritual and temporal needs",
    ),
    novena(
        "st_carlo",
        "St. Carlo Acutis",
        "Novena to St. Carlo Acutis, the Patron Saint of programmers",
    ),
    novena(
        "perpetual_help",
        "Our Lady of Perpetual Help",
        "Novena to Our Lady of Perpetual Help for intercession and protection",
    ),
    novena(
        "divine_mercy",
        "Divine Mercy",
        "The Divine Mercy Novena typically prayed before Divine Mercy Sunday",
    ),
    novena(
        "st_jude",
        "St. Jude Thaddeus",
        "Novena to St. Jude, patron saint of hopeless cases",
    ),
    novena(
        "immaculate_heart",
        "Immaculate Heart of Mary",
        "Novena to the Immaculate Heart of Mary for peace and conversion",
    ),
    novena(
        "st_anthony",
        "St. Anthony of Padua",
        "Novena to St. Anthony for help in finding lost things and guidance",
    ),
    novena(
        "holy_spirit",
        "Holy Spirit",
        "Novena to the Holy Spirit for wisdom, guidance, and spiritual gifts",
    ),
    novena(
        "st_therese",
        "St. Thérèse of Lisieux",
        "Novena to St. Thérèse, the Little Flower, for intercession and roses",
    ),
];

#[derive(Default)]
pub struct NovenaCatalog;

impl NovenaCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn all(&self) -> &'static [Novena] {
        &NOVENAS
    }

    pub fn get(&self, id: &str) -> Option<&'static Novena> {
        NOVENAS.iter().find(|n| n.id == id)
    }

    pub fn resource_path(novena: &Novena, language: Language) -> String {
        format!("novenas/{}_{}.txt", novena.id, language.file_stem())
    }

    pub fn novena_text(&self, novena: &Novena, language: Language, loader: &dyn ResourceLoader) -> String {
        let path = Self::resource_path(novena, language);
        loader
            .load(&path)
            .unwrap_or_else(|| format!("Resource not found: {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::resources::MemoryResourceLoader;

    #[test]
    fn catalog_has_nine_day_novenas() {
        let catalog = NovenaCatalog::new();
        assert_eq!(catalog.all().len(), 9);
        assert!(catalog.all().iter().all(|n| n.duration_days == NOVENA_DAYS));
        assert_eq!(catalog.get("st_jude").map(|n| n.name), Some("St. Jude Thaddeus"));
        assert!(catalog.get("st_nobody").is_none());
    }

    #[test]
    fn text_is_loaded_per_language() {
        let catalog = NovenaCatalog::new();
        let loader = MemoryResourceLoader::new().with("novenas/holy_spirit_latin.txt", "Veni, Sancte Spiritus");
        let holy_spirit = catalog.get("holy_spirit").unwrap();

        assert_eq!(
            catalog.novena_text(holy_spirit, Language::Latin, &loader),
            "Veni, Sancte Spiritus"
        );
        assert_eq!(
            catalog.novena_text(holy_spirit, Language::English, &loader),
            "Resource not found: novenas/holy_spirit_english.txt"
        );
    }
}
