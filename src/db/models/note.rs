//! Prayer journal models.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OratioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteCategory {
    Prayer,
    Reflection,
    Intention,
    Gratitude,
    Novena,
    Other,
}

impl NoteCategory {
    pub const ALL: [NoteCategory; 6] = [
        NoteCategory::Prayer,
        NoteCategory::Reflection,
        NoteCategory::Intention,
        NoteCategory::Gratitude,
        NoteCategory::Novena,
        NoteCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteCategory::Prayer => "Prayer",
            NoteCategory::Reflection => "Reflection",
            NoteCategory::Intention => "Intention",
            NoteCategory::Gratitude => "Gratitude",
            NoteCategory::Novena => "Novena",
            NoteCategory::Other => "Other",
        }
    }
}

impl fmt::Display for NoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteCategory {
    type Err = OratioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NoteCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| OratioError::UnknownNoteCategory(value.to_string()))
    }
}

/// A journal entry: reflection, intention, gratitude list, novena log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: NoteCategory,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating or editing a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub category: NoteCategory,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: NoteCategory) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
        }
    }
}
