use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use super::notes::insert_note;
use crate::{
    db::{
        connection::Database,
        helpers::{format_date, format_datetime, parse_date, parse_optional_datetime},
        models::{Note, NoteInput, NovenaProgress},
    },
    error::OratioError,
};

fn row_to_progress(row: &Row) -> Result<NovenaProgress> {
    let started_on: String = row.get("started_on")?;
    let finished_at: Option<String> = row.get("finished_at")?;

    Ok(NovenaProgress {
        novena_id: row.get("novena_id")?,
        started_on: parse_date(&started_on, "started_on")?,
        finished_at: parse_optional_datetime(finished_at, "finished_at")?,
    })
}

fn insert_progress(
    conn: &Connection,
    novena_id: String,
    started_on: NaiveDate,
) -> Result<NovenaProgress> {
    let active: i64 = conn.query_row(
        "SELECT COUNT(*) FROM novena_progress WHERE novena_id = ?1 AND finished_at IS NULL",
        params![novena_id],
        |row| row.get(0),
    )?;
    if active > 0 {
        return Err(OratioError::NovenaAlreadyActive(novena_id).into());
    }

    conn.execute(
        "INSERT OR REPLACE INTO novena_progress (novena_id, started_on, finished_at)
         VALUES (?1, ?2, NULL)",
        params![novena_id, format_date(&started_on)],
    )?;

    Ok(NovenaProgress {
        novena_id,
        started_on,
        finished_at: None,
    })
}

impl Database {
    /// Records the start of a novena. A finished run of the same novena is
    /// replaced; an active one is an error.
    pub async fn start_novena(&self, novena_id: &str, started_on: NaiveDate) -> Result<NovenaProgress> {
        let novena_id = novena_id.to_string();
        self.execute(move |conn| insert_progress(conn, novena_id, started_on))
            .await
    }

    /// Starts a novena and writes its opening journal note in one
    /// transaction. Either both rows land or neither does.
    pub async fn start_novena_with_note(
        &self,
        novena_id: &str,
        started_on: NaiveDate,
        note: NoteInput,
    ) -> Result<(NovenaProgress, Note)> {
        let novena_id = novena_id.to_string();
        self.execute(move |conn| {
            let tx = conn
                .transaction()
                .context("failed to open novena transaction")?;
            let progress = insert_progress(&tx, novena_id, started_on)?;
            let note = insert_note(&tx, note)?;
            tx.commit().context("failed to commit novena start")?;
            Ok((progress, note))
        })
        .await
    }

    /// Marks an active novena finished. Returns whether one was active.
    pub async fn finish_novena(&self, novena_id: &str) -> Result<bool> {
        let novena_id = novena_id.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE novena_progress SET finished_at = ?1
                 WHERE novena_id = ?2 AND finished_at IS NULL",
                params![format_datetime(&Utc::now()), novena_id],
            )?;
            Ok(updated > 0)
        })
        .await
    }

    pub async fn novena_progress(&self, novena_id: &str) -> Result<Option<NovenaProgress>> {
        let novena_id = novena_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT novena_id, started_on, finished_at FROM novena_progress WHERE novena_id = ?1",
            )?;
            let mut rows = stmt.query(params![novena_id])?;
            let progress = rows.next()?.map(row_to_progress).transpose()?;
            Ok(progress)
        })
        .await
    }

    pub async fn active_novenas(&self) -> Result<Vec<NovenaProgress>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT novena_id, started_on, finished_at
                 FROM novena_progress
                 WHERE finished_at IS NULL
                 ORDER BY started_on ASC, novena_id ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut active = Vec::new();
            while let Some(row) = rows.next()? {
                active.push(row_to_progress(row)?);
            }
            Ok(active)
        })
        .await
    }
}
