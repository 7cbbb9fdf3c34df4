use chrono::{Datelike, Local, Weekday};
use serde::Serialize;

use super::language::{Language, LanguageService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MysteryType {
    Joyful,
    Sorrowful,
    Glorious,
    Luminous,
}

impl MysteryType {
    pub fn id(&self) -> &'static str {
        match self {
            MysteryType::Joyful => "joyful",
            MysteryType::Sorrowful => "sorrowful",
            MysteryType::Glorious => "glorious",
            MysteryType::Luminous => "luminous",
        }
    }

    /// Traditional weekly schedule.
    pub fn for_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon | Weekday::Sat => MysteryType::Joyful,
            Weekday::Tue | Weekday::Fri => MysteryType::Sorrowful,
            Weekday::Wed | Weekday::Sun => MysteryType::Glorious,
            Weekday::Thu => MysteryType::Luminous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosaryMystery {
    pub kind: MysteryType,
    pub name: &'static str,
    pub days: &'static [Weekday],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosaryStep {
    pub id: String,
    pub name: String,
    /// Translation key of the prayer said at this step; empty for a mystery
    /// announcement.
    pub prayer_key: &'static str,
    pub repetitions: u32,
    /// Translation key of the meditation shown before the prayer.
    pub meditation_key: Option<&'static str>,
}

impl RosaryStep {
    fn prayer(id: impl Into<String>, name: impl Into<String>, prayer_key: &'static str, repetitions: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prayer_key,
            repetitions,
            meditation_key: None,
        }
    }
}

const DECADES: u32 = 5;
const MEDITATION_KEY: &str = "mystery_meditation";

pub struct RosaryGuide {
    mysteries: Vec<RosaryMystery>,
}

impl Default for RosaryGuide {
    fn default() -> Self {
        Self::new()
    }
}

impl RosaryGuide {
    pub fn new() -> Self {
        Self {
            mysteries: vec![
                RosaryMystery {
                    kind: MysteryType::Joyful,
                    name: "Joyful Mysteries",
                    days: &[Weekday::Mon, Weekday::Sat],
                },
                RosaryMystery {
                    kind: MysteryType::Sorrowful,
                    name: "Sorrowful Mysteries",
                    days: &[Weekday::Tue, Weekday::Fri],
                },
                RosaryMystery {
                    kind: MysteryType::Glorious,
                    name: "Glorious Mysteries",
                    days: &[Weekday::Wed, Weekday::Sun],
                },
                RosaryMystery {
                    kind: MysteryType::Luminous,
                    name: "Luminous Mysteries",
                    days: &[Weekday::Thu],
                },
            ],
        }
    }

    pub fn mysteries(&self) -> &[RosaryMystery] {
        &self.mysteries
    }

    pub fn mystery(&self, kind: MysteryType) -> &RosaryMystery {
        self.mysteries
            .iter()
            .find(|m| m.kind == kind)
            .unwrap_or(&self.mysteries[0])
    }

    pub fn mystery_for(&self, weekday: Weekday) -> &RosaryMystery {
        self.mystery(MysteryType::for_weekday(weekday))
    }

    pub fn todays_mystery(&self) -> &RosaryMystery {
        self.mystery_for(Local::now().weekday())
    }

    pub fn mystery_title(&self, mystery: &RosaryMystery, language: Language, texts: &LanguageService) -> String {
        texts
            .lookup(&format!("{}_title", mystery.kind.id()), language)
            .unwrap_or(mystery.name)
            .to_string()
    }

    /// Full sequence: opening prayers, five decades, closing prayers.
    pub fn steps(&self, mystery: &RosaryMystery, language: Language, texts: &LanguageService) -> Vec<RosaryStep> {
        let mut steps = vec![
            RosaryStep::prayer("sign_cross", "Sign of the Cross", "sign_cross", 1),
            RosaryStep::prayer("apostles_creed", "Apostles' Creed", "apostles_creed", 1),
            RosaryStep::prayer("our_father_1", "Our Father", "our_father", 1),
            RosaryStep::prayer("hail_mary_1", "First Hail Mary (Faith)", "hail_mary", 1),
            RosaryStep::prayer("hail_mary_2", "Second Hail Mary (Hope)", "hail_mary", 1),
            RosaryStep::prayer("hail_mary_3", "Third Hail Mary (Charity)", "hail_mary", 1),
            RosaryStep::prayer("glory_be_1", "Glory Be", "glory_be", 1),
        ];

        for decade in 1..=DECADES {
            let mystery_name = texts.translate_in(&format!("{}_mystery_{decade}", mystery.kind.id()), language);
            steps.push(RosaryStep {
                id: format!("mystery_{decade}"),
                name: format!("{decade}. {mystery_name}"),
                prayer_key: "",
                repetitions: 1,
                meditation_key: Some(MEDITATION_KEY),
            });
            steps.push(RosaryStep::prayer(format!("our_father_{}", decade + 1), "Our Father", "our_father", 1));
            steps.push(RosaryStep::prayer(format!("hail_mary_decade_{decade}"), "Ten Hail Marys", "hail_mary", 10));
            steps.push(RosaryStep::prayer(format!("glory_be_{}", decade + 1), "Glory Be", "glory_be", 1));
            steps.push(RosaryStep::prayer(format!("fatima_prayer_{decade}"), "Fatima Prayer", "fatima_prayer", 1));
        }

        steps.extend([
            RosaryStep::prayer("hail_holy_queen", "Hail Holy Queen", "hail_holy_queen", 1),
            RosaryStep::prayer("final_prayer", "Final Prayer", "rosary_final_prayer", 1),
            RosaryStep::prayer("sign_cross_final", "Sign of the Cross", "sign_cross", 1),
        ]);

        steps
    }

    pub fn step_text(&self, step: &RosaryStep, language: Language, texts: &LanguageService) -> String {
        let base = if step.prayer_key.is_empty() {
            String::new()
        } else {
            texts.translate_in(step.prayer_key, language)
        };

        if let Some(meditation_key) = step.meditation_key {
            let meditation = texts.translate_in(meditation_key, language);
            return if base.is_empty() {
                meditation
            } else {
                format!("{meditation}\n\n{base}")
            };
        }

        if step.repetitions > 1 {
            return format!("{base}\n\n(Repeat {} times)", step.repetitions);
        }

        base
    }
}
