use tracing::{
    debug,
    info,
};

use super::{
    schema::{
        FieldId,
        FIELD_COUNT,
    },
    PipError,
    Record,
};
use crate::spreadsheet::{
    RawCell,
    RawSheet,
};

/// How well a source header matches a field. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderMatch {
    Exact,
    KeyContainsLabel,
    LabelContainsKey,
    KeyContainsId,
    IdContainsKey,
}

impl HeaderMatch {
    fn is_strong(self) -> bool {
        self <= HeaderMatch::KeyContainsLabel
    }
}

fn claimed_by_other(row: &[Option<HeaderMatch>; FIELD_COUNT], field: FieldId) -> bool {
    FieldId::ALL
        .into_iter()
        .any(|other| other != field && row[other.index()].is_some_and(HeaderMatch::is_strong))
}

/// Lowercases and drops everything except ASCII letters and digits.
pub fn normalize_key(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect()
}

pub fn match_header(header: &str, field: FieldId) -> Option<HeaderMatch> {
    let key = normalize_key(header);
    if key.is_empty() {
        return None;
    }

    let label = normalize_key(field.label());
    let id = normalize_key(field.key());

    if key == label || key == id {
        Some(HeaderMatch::Exact)
    } else if key.contains(&label) {
        Some(HeaderMatch::KeyContainsLabel)
    } else if label.contains(&key) {
        Some(HeaderMatch::LabelContainsKey)
    } else if key.contains(&id) {
        Some(HeaderMatch::KeyContainsId)
    } else if id.contains(&key) {
        Some(HeaderMatch::IdContainsKey)
    } else {
        None
    }
}

/// Column chosen for every field, resolved once per sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: [Option<usize>; FIELD_COUNT],
}

impl ColumnMapping {
    /// Picks the best-ranked header for each field; equal ranks go to the leftmost column.
    /// A loose match avoids a column that another field matches by its exact key or
    /// label, so "NIK Ibu Kandung" is not read as the student's NIK when a
    /// "NIK Siswa" column exists.
    pub fn resolve(headers: &[String]) -> Self {
        let ranks: Vec<[Option<HeaderMatch>; FIELD_COUNT]> = headers
            .iter()
            .map(|header| FieldId::ALL.map(|field| match_header(header, field)))
            .collect();

        let mut columns = [None; FIELD_COUNT];
        for field in FieldId::ALL {
            columns[field.index()] = ranks
                .iter()
                .enumerate()
                .filter_map(|(column, row)| {
                    let rank = row[field.index()]?;
                    let tier = if rank.is_strong() {
                        0
                    } else if claimed_by_other(row, field) {
                        2
                    } else {
                        1
                    };
                    Some((tier, rank, column))
                })
                .min()
                .map(|(_, _, column)| column);
        }

        Self { columns }
    }

    pub fn column(&self, field: FieldId) -> Option<usize> {
        self.columns[field.index()]
    }

    pub fn unmatched(&self) -> Vec<FieldId> {
        FieldId::ALL.into_iter().filter(|field| self.column(*field).is_none()).collect()
    }
}

pub fn sanitize_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_blank_row(row: &[RawCell]) -> bool {
    row.iter().all(RawCell::is_blank)
}

pub fn normalize_row(row: &[RawCell], mapping: &ColumnMapping) -> Record {
    let mut record = Record::new();

    for field in FieldId::ALL {
        let text = mapping
            .column(field)
            .and_then(|column| row.get(column))
            .map(RawCell::to_text)
            .unwrap_or_default();

        let value = if field.definition().digits_only() { sanitize_digits(&text) } else { text };
        record.set(field, &value);
    }

    record
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub records: Vec<Record>,
    pub skipped_blank_rows: usize,
    pub unmatched_fields: Vec<FieldId>,
}

/// Converts every non-blank row of `sheet` into a [`Record`]. A sheet with no
/// usable rows is rejected as a whole.
pub fn normalize_sheet(sheet: &RawSheet) -> Result<ImportOutcome, PipError> {
    let mapping = ColumnMapping::resolve(&sheet.headers);
    let unmatched_fields = mapping.unmatched();

    if !unmatched_fields.is_empty() {
        debug!(
            "No column found for: {}",
            unmatched_fields.iter().map(|f| f.key()).collect::<Vec<_>>().join(", ")
        );
    }

    let mut skipped_blank_rows = 0;
    let mut records = Vec::with_capacity(sheet.rows.len());

    for row in &sheet.rows {
        if is_blank_row(row) {
            skipped_blank_rows += 1;
            continue;
        }
        records.push(normalize_row(row, &mapping));
    }

    if records.is_empty() {
        return Err(PipError::EmptySheet);
    }

    info!("Mapped {} rows ({} blank rows skipped)", records.len(), skipped_blank_rows);

    Ok(ImportOutcome { records, skipped_blank_rows, unmatched_fields })
}
