//! CSV import/export for the weekly playlist grid.
//!
//! The export comes in two styles: a plain listing for printing and a
//! variant that carries slot ids so an edited file can be re-imported as an
//! update. Import accepts both shapes (headers matched case-insensitively),
//! commits row by row and aborts on the first invalid row, reporting its
//! physical line number in the file (the header is line 1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::repository::{FullRepository, RepositoryError, UpsertOutcome};
use crate::models::{SlotId, ValidationError, Weekday};

use super::playlist::SlotInput;
use super::ServiceResult;

/// Which columns the export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    /// `no,day,day_name,start,end,program,tracks` with a running row number.
    #[default]
    Plain,
    /// `id,day,day_name,start,end,program,tracks`, re-importable as updates.
    Identified,
}

impl ExportStyle {
    /// Suggested download filename for this style.
    pub fn filename(self) -> &'static str {
        match self {
            ExportStyle::Plain => "playlist.csv",
            ExportStyle::Identified => "playlist_with_ids.csv",
        }
    }
}

/// How an import treats the existing grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Keep existing slots; rows with a resolving id update them in place,
    /// everything else appends at the end of its day.
    #[default]
    Append,
    /// Wipe the grid first, then insert every row.
    Replace,
}

/// What an import did, for the operator's confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub mode: ImportMode,
}

/// Import failure. Rows committed before the failure stay committed.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file is not parseable CSV at all.
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    /// A required header is absent.
    #[error("missing required column {name:?}")]
    MissingColumn { name: &'static str },

    /// A data row failed field validation; `line` is the 1-based physical
    /// line in the file, counting the header as line 1.
    #[error("line {line}: {source}")]
    Row {
        line: u64,
        source: ValidationError,
    },

    /// The backing store failed mid-import.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Malformed(_) => "MALFORMED_CSV",
            ImportError::MissingColumn { .. } => "MISSING_REQUIRED_COLUMN",
            ImportError::Row { source, .. } => source.code(),
            ImportError::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// The failing line for row-level errors.
    pub fn line(&self) -> Option<u64> {
        match self {
            ImportError::Row { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Render the whole grid as CSV in display order.
pub async fn export_grid(repo: &dyn FullRepository, style: ExportStyle) -> ServiceResult<String> {
    let slots = repo.list_slots().await?;
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: [&str; 7] = match style {
        ExportStyle::Plain => ["no", "day", "day_name", "start", "end", "program", "tracks"],
        ExportStyle::Identified => ["id", "day", "day_name", "start", "end", "program", "tracks"],
    };
    writer.write_record(header).map_err(csv_write_error)?;

    for (index, slot) in slots.iter().enumerate() {
        let first = match style {
            ExportStyle::Plain => (index + 1).to_string(),
            ExportStyle::Identified => slot.id.as_str().to_string(),
        };
        writer
            .write_record([
                first.as_str(),
                &slot.day.one_based().to_string(),
                slot.day.name_id(),
                &slot.start.to_string(),
                &slot.end.to_string(),
                &slot.program,
                &slot.tracks.replace("\r\n", "\n"),
            ])
            .map_err(csv_write_error)?;
    }

    writer.flush().map_err(|e| csv_write_error(e.into()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| RepositoryError::internal(format!("CSV buffer error: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| RepositoryError::internal(format!("CSV not UTF-8: {e}")).into())
}

fn csv_write_error(e: csv::Error) -> RepositoryError {
    RepositoryError::internal(format!("CSV write error: {e}"))
}

/// Resolved header layout of an import file.
struct Columns {
    id: Option<usize>,
    day: Option<usize>,
    day_name: Option<usize>,
    start: usize,
    end: usize,
    program: usize,
    tracks: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let day = find("day");
        let day_name = find("day_name");
        if day.is_none() && day_name.is_none() {
            return Err(ImportError::MissingColumn { name: "day" });
        }

        Ok(Columns {
            id: find("id"),
            day,
            day_name,
            start: find("start").ok_or(ImportError::MissingColumn { name: "start" })?,
            end: find("end").ok_or(ImportError::MissingColumn { name: "end" })?,
            program: find("program").ok_or(ImportError::MissingColumn { name: "program" })?,
            tracks: find("tracks"),
        })
    }

    /// The day token for a row: the numeric `day` column when present and
    /// non-blank, otherwise `day_name`.
    fn day_token<'r>(&self, record: &'r csv::StringRecord) -> &'r str {
        let from = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();
        let token = from(self.day);
        if token.is_empty() {
            from(self.day_name)
        } else {
            token
        }
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, idx: Option<usize>) -> &'r str {
        idx.and_then(|i| record.get(i)).unwrap_or("")
    }
}

/// Import a CSV file into the grid.
///
/// Commits are per row; the returned error for an invalid row carries the
/// 1-based file line and does not undo earlier rows.
pub async fn import_grid(
    repo: &dyn FullRepository,
    csv_text: &str,
    mode: ImportMode,
) -> Result<ImportSummary, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());
    let columns = Columns::resolve(reader.headers()?)?;

    if mode == ImportMode::Replace {
        repo.delete_all_slots().await?;
    }

    let mut inserted = 0usize;
    let mut updated = 0usize;
    // Per-day append position, seeded lazily from the store and advanced
    // only when a row actually inserts.
    let mut next_keys: HashMap<Weekday, i32> = HashMap::new();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        let input = SlotInput {
            day: columns.day_token(&record).to_string(),
            start: columns.field(&record, Some(columns.start)).to_string(),
            end: columns.field(&record, Some(columns.end)).to_string(),
            program: columns.field(&record, Some(columns.program)).to_string(),
            tracks: columns.field(&record, columns.tracks).to_string(),
        };
        let validated = input
            .validate()
            .map_err(|source| ImportError::Row { line, source })?;
        let day = validated.day;

        let sort_key = match next_keys.get(&day) {
            Some(key) => *key,
            None => {
                let key = repo.max_sort_key(day).await? + 1;
                next_keys.insert(day, key);
                key
            }
        };

        let draft = crate::models::SlotDraft {
            day,
            start: validated.start,
            end: validated.end,
            program: validated.program,
            tracks: validated.tracks,
            sort_key,
        };

        let row_id = columns.field(&record, columns.id).trim();
        let outcome = if mode == ImportMode::Append && !row_id.is_empty() {
            repo.upsert_slot(&SlotId::new(row_id), draft).await?
        } else {
            // Replace mode inserts everything: file ids cannot resolve
            // after the wipe.
            UpsertOutcome::Inserted(repo.insert_slot(draft).await?)
        };

        match outcome {
            UpsertOutcome::Inserted(_) => {
                inserted += 1;
                next_keys.insert(day, sort_key + 1);
            }
            UpsertOutcome::Updated => updated += 1,
        }
    }

    Ok(ImportSummary {
        inserted,
        updated,
        mode,
    })
}

#[cfg(test)]
#[path = "grid_csv_tests.rs"]
mod grid_csv_tests;
