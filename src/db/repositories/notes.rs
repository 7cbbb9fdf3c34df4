use anyhow::{Context, Result};
use chrono::{SubsecRound, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::{
    db::{
        connection::Database,
        helpers::{format_datetime, parse_datetime},
        models::{Note, NoteCategory, NoteInput},
    },
    error::OratioError,
};

const NOTE_COLUMNS: &str = "id, title, content, category, created_at, modified_at";

fn row_to_note(row: &Row) -> Result<Note> {
    let category: String = row.get("category")?;
    let created_at: String = row.get("created_at")?;
    let modified_at: String = row.get("modified_at")?;

    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category: category.parse()?,
        created_at: parse_datetime(&created_at, "created_at")?,
        modified_at: parse_datetime(&modified_at, "modified_at")?,
    })
}

fn collect_notes(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(row_to_note(row)?);
    }
    Ok(notes)
}

fn default_notes() -> [NoteInput; 3] {
    [
        NoteInput::new(
            "Welcome to Oratio",
            "Welcome to your prayer journal!\n\n\
             This space is for your personal reflections, prayer intentions, \
             and spiritual insights. You can organize your notes by categories \
             like Prayer, Reflection, Intention, Gratitude, or Other.\n\n\
             May this digital companion support you in your spiritual journey.",
            NoteCategory::Other,
        ),
        NoteInput::new(
            "Prayer Intentions",
            "Today I pray for:\n\n\
             • My family's health and wellbeing\n\
             • Peace in our troubled world\n\
             • Those who are suffering\n\
             • Guidance in my spiritual journey\n\n\
             Lord, hear our prayers.",
            NoteCategory::Intention,
        ),
        NoteInput::new(
            "Daily Gratitude",
            "Things I'm grateful for today:\n\n\
             • The gift of life and health\n\
             • My loved ones\n\
             • God's constant presence\n\
             • The beauty of creation\n\n\
             Thank you, Lord, for all your blessings.",
            NoteCategory::Gratitude,
        ),
    ]
}

/// Inserts a fresh note on an open connection or transaction.
pub(super) fn insert_note(conn: &Connection, input: NoteInput) -> Result<Note> {
    let now = Utc::now().trunc_subsecs(6);
    let note = Note {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        content: input.content,
        category: input.category,
        created_at: now,
        modified_at: now,
    };

    conn.execute(
        "INSERT INTO notes (id, title, content, category, created_at, modified_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            note.id,
            note.title,
            note.content,
            note.category.as_str(),
            format_datetime(&note.created_at),
            format_datetime(&note.modified_at),
        ],
    )
    .context("failed to insert note")?;

    Ok(note)
}

impl Database {
    pub async fn create_note(&self, input: NoteInput) -> Result<Note> {
        self.execute(move |conn| insert_note(conn, input)).await
    }

    /// Replaces title, content and category, bumping `modified_at`.
    pub async fn update_note(&self, note_id: &str, input: NoteInput) -> Result<Note> {
        let note_id = note_id.to_string();
        self.execute(move |conn| {
            let now = Utc::now();
            let rows_affected = conn.execute(
                "UPDATE notes
                 SET title = ?1, content = ?2, category = ?3, modified_at = ?4
                 WHERE id = ?5",
                params![
                    input.title,
                    input.content,
                    input.category.as_str(),
                    format_datetime(&now),
                    note_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(OratioError::NotFound {
                    kind: "note",
                    id: note_id,
                }
                .into());
            }

            let mut stmt =
                conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"))?;
            let mut rows = stmt.query(params![note_id])?;
            let note = match rows.next()? {
                Some(row) => row_to_note(row)?,
                None => {
                    return Err(OratioError::NotFound {
                        kind: "note",
                        id: note_id,
                    }
                    .into())
                }
            };
            Ok(note)
        })
        .await
    }

    /// Returns whether a note was deleted.
    pub async fn delete_note(&self, note_id: &str) -> Result<bool> {
        let note_id = note_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", params![note_id])?;
            Ok(rows_affected > 0)
        })
        .await
    }

    pub async fn get_note(&self, note_id: &str) -> Result<Option<Note>> {
        let note_id = note_id.to_string();
        self.execute(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"))?;
            let mut rows = stmt.query(params![note_id])?;
            let note = rows.next()?.map(row_to_note).transpose()?;
            Ok(note)
        })
        .await
    }

    /// All notes, most recently modified first.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes ORDER BY modified_at DESC, rowid DESC"
            ))?;
            let mut rows = stmt.query([])?;
            collect_notes(&mut rows)
        })
        .await
    }

    pub async fn notes_by_category(&self, category: NoteCategory) -> Result<Vec<Note>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE category = ?1
                 ORDER BY modified_at DESC, rowid DESC"
            ))?;
            let mut rows = stmt.query(params![category.as_str()])?;
            collect_notes(&mut rows)
        })
        .await
    }

    /// Case-insensitive substring match on title or content. Folding uses
    /// Unicode lowercase on both sides, so "ÉLAN" finds "élan".
    pub async fn search_notes(&self, term: &str) -> Result<Vec<Note>> {
        let needle = term.trim().to_lowercase();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE instr(unicode_lower(title), ?1) > 0
                    OR instr(unicode_lower(content), ?1) > 0
                 ORDER BY modified_at DESC, rowid DESC"
            ))?;
            let mut rows = stmt.query(params![needle])?;
            collect_notes(&mut rows)
        })
        .await
    }

    pub async fn count_notes(&self) -> Result<i64> {
        self.execute(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    /// Writes the welcome notes into an empty journal. Returns how many were
    /// created.
    pub async fn seed_default_notes(&self) -> Result<usize> {
        if self.count_notes().await? > 0 {
            return Ok(0);
        }

        let defaults = default_notes();
        let count = defaults.len();
        for input in defaults {
            self.create_note(input).await?;
        }
        Ok(count)
    }
}
