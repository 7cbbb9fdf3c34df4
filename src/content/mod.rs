pub mod language;
pub mod novenas;
pub mod prayers;
pub mod psalms;
pub mod resources;
pub mod rosary;

pub use language::{Language, LanguageService};
pub use novenas::{Novena, NovenaCatalog};
pub use prayers::{Prayer, PrayerCatalog, PrayerCategory};
pub use psalms::{Psalm, PsalmCatalog};
pub use resources::{FsResourceLoader, MemoryResourceLoader, ResourceLoader};
pub use rosary::{MysteryType, RosaryGuide, RosaryMystery, RosaryStep};
