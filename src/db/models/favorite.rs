use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FavoriteKind {
    Prayer,
    Psalm,
    Novena,
}

impl FavoriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Prayer => "Prayer",
            FavoriteKind::Psalm => "Psalm",
            FavoriteKind::Novena => "Novena",
        }
    }
}

impl FromStr for FavoriteKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Prayer" => Ok(FavoriteKind::Prayer),
            "Psalm" => Ok(FavoriteKind::Psalm),
            "Novena" => Ok(FavoriteKind::Novena),
            other => Err(anyhow!("unknown favorite kind {other}")),
        }
    }
}

/// A starred prayer id, psalm number or novena id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub kind: FavoriteKind,
    pub item_id: String,
    pub created_at: DateTime<Utc>,
}
