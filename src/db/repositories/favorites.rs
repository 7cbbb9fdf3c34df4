use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime},
    models::{Favorite, FavoriteKind},
};

fn row_to_favorite(row: &Row) -> Result<Favorite> {
    let kind: String = row.get("kind")?;
    let created_at: String = row.get("created_at")?;

    Ok(Favorite {
        kind: kind.parse()?,
        item_id: row.get("item_id")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Stars an item. Starring twice is a no-op; returns whether a row was added.
    pub async fn add_favorite(&self, kind: FavoriteKind, item_id: &str) -> Result<bool> {
        let item_id = item_id.to_string();
        self.execute(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO favorites (kind, item_id, created_at) VALUES (?1, ?2, ?3)",
                params![kind.as_str(), item_id, format_datetime(&Utc::now())],
            )?;
            Ok(inserted > 0)
        })
        .await
    }

    pub async fn remove_favorite(&self, kind: FavoriteKind, item_id: &str) -> Result<bool> {
        let item_id = item_id.to_string();
        self.execute(move |conn| {
            let removed = conn.execute(
                "DELETE FROM favorites WHERE kind = ?1 AND item_id = ?2",
                params![kind.as_str(), item_id],
            )?;
            Ok(removed > 0)
        })
        .await
    }

    pub async fn is_favorite(&self, kind: FavoriteKind, item_id: &str) -> Result<bool> {
        let item_id = item_id.to_string();
        self.execute(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM favorites WHERE kind = ?1 AND item_id = ?2",
                params![kind.as_str(), item_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
    }

    /// Favorites of one kind in the order they were starred.
    pub async fn list_favorites(&self, kind: FavoriteKind) -> Result<Vec<Favorite>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT kind, item_id, created_at
                 FROM favorites
                 WHERE kind = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;

            let mut rows = stmt.query(params![kind.as_str()])?;
            let mut favorites = Vec::new();
            while let Some(row) = rows.next()? {
                favorites.push(row_to_favorite(row)?);
            }
            Ok(favorites)
        })
        .await
    }
}
