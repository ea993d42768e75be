use std::{
    borrow::Cow,
    fs,
    io::Cursor,
    path::Path,
};

use calamine::{
    open_workbook_auto_from_rs,
    Data,
    Reader,
};
use chrono::NaiveDateTime;
use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::core::PipError;

/// A cell as found in the source file. Numeric cells keep their binary value so
/// the normalizer can print them without scientific notation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Date(NaiveDateTime),
}

impl RawCell {
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text of the cell: fixed-point digits for numbers, `dd-mm-yyyy` for
    /// dates, trimmed text otherwise.
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(text) => text.trim().to_string(),
            RawCell::Number(n) => format_number(*n),
            RawCell::Integer(n) => n.to_string(),
            RawCell::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            RawCell::Date(dt) => dt.format("%d-%m-%Y").to_string(),
        }
    }
}

/// Formats a float with no grouping and no exponent. Integral values print
/// without a decimal part, so a 16 digit NIK stays 16 digits.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    /// Data rows, each at least `headers.len()` cells wide.
    pub rows: Vec<Vec<RawCell>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub const EXTENSIONS: [&'static str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

    pub fn from_file_name(file_name: &str) -> Result<Self, PipError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| PipError::UnsupportedFileType(file_name.to_string()))?;

        match extension.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            ext if Self::EXTENSIONS.contains(&ext) => Ok(SheetFormat::Workbook),
            other => Err(PipError::UnsupportedFileType(other.to_string())),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_file_name(&path.to_string_lossy()).is_ok()
    }
}

/// Reads the whole file into memory, then parses its first sheet.
pub fn read_sheet(path: &Path) -> Result<RawSheet, PipError> {
    let file_name = path.to_string_lossy();
    SheetFormat::from_file_name(&file_name)?;
    let bytes = fs::read(path)?;
    parse_sheet(&file_name, bytes)
}

pub fn parse_sheet(file_name: &str, bytes: Vec<u8>) -> Result<RawSheet, PipError> {
    if bytes.is_empty() {
        return Err(PipError::EmptySheet);
    }

    let table = match SheetFormat::from_file_name(file_name)? {
        SheetFormat::Workbook => parse_workbook(bytes)?,
        SheetFormat::Csv => parse_csv(&bytes)?,
    };

    let (name, mut rows) = table;
    if rows.is_empty() {
        return Err(PipError::EmptySheet);
    }

    let headers: Vec<String> = rows.remove(0).iter().map(RawCell::to_text).collect();
    if rows.is_empty() {
        return Err(PipError::EmptySheet);
    }

    for row in &mut rows {
        if row.len() < headers.len() {
            row.resize(headers.len(), RawCell::Empty);
        }
    }

    debug!("Parsed sheet '{}': {} columns, {} data rows", name, headers.len(), rows.len());
    Ok(RawSheet { name, headers, rows })
}

fn parse_workbook(bytes: Vec<u8>) -> Result<(String, Vec<Vec<RawCell>>), PipError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook.sheet_names().first().cloned().ok_or(PipError::EmptySheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let rows = range.rows().map(|row| row.iter().map(convert_cell).collect()).collect();

    Ok((sheet_name, rows))
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Integer(*i),
        Data::Bool(b) => RawCell::Boolean(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => RawCell::Date(datetime),
            None => RawCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(e.to_string()),
    }
}

fn parse_csv(bytes: &[u8]) -> Result<(String, Vec<Vec<RawCell>>), PipError> {
    let text = decode_text(bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let delimiter = detect_delimiter(text.lines().next().unwrap_or_default());
    let rows = parse_csv_records(text, delimiter)
        .into_iter()
        .map(|fields| {
            fields
                .into_iter()
                .map(|field| if field.is_empty() { RawCell::Empty } else { RawCell::Text(field) })
                .collect()
        })
        .collect();

    Ok(("csv".to_string(), rows))
}

/// Excel on Windows saves "CSV (comma delimited)" in the ANSI code page, so
/// anything that is not valid UTF-8 is read as Windows-1252.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("CSV is not valid UTF-8, decoding as Windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}

/// Spreadsheets saved with an Indonesian locale use `;` between fields.
fn detect_delimiter(header_line: &str) -> char {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

// Quote-aware CSV split; quoted fields may contain delimiters, doubled quotes and newlines
fn parse_csv_records(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if field_started || !field.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
