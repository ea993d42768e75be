use std::path::Path;

use rust_xlsxwriter::{
    Format,
    Workbook,
};
use tracing::info;

use crate::core::{
    schema::FieldId,
    PipError,
};

pub const DEFAULT_TEMPLATE_NAME: &str = "Template_Data_PIP_SMAK_SMTK.xlsx";
pub const TEMPLATE_SHEET_NAME: &str = "Template_PIP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStyle {
    HeaderOnly,
    WithSample,
}

fn sample_value(id: FieldId) -> &'static str {
    match id {
        FieldId::Nik => "3171012345678901",
        FieldId::Nisn => "0051234567",
        FieldId::NamaLengkap => "Contoh Nama Siswa",
        FieldId::JenisKelamin => "Perempuan",
        FieldId::TempatTanggalLahir => "Medan, 12-03-2008",
        FieldId::NikIbu => "1271015508800002",
        FieldId::NamaIbu => "Contoh Nama Ibu",
        FieldId::Emis => "131212710001",
        FieldId::Npsn => "69912345",
        FieldId::JenisSekolah => "SMAK",
        FieldId::NamaSekolah => "SMAK Contoh",
        FieldId::KabKota => "Kota Medan",
        FieldId::Provinsi => "Sumatera Utara",
        FieldId::Bank => "BRI",
        FieldId::NoRekening => "012301000123456",
        FieldId::NamaRekening => "Contoh Nama Siswa",
        FieldId::Nominal => "1800000",
        FieldId::TahunPenerimaan => "2025",
    }
}

/// Builds the import template: one sheet whose header row is every field
/// label in order. Digit columns are formatted as text so long identifiers
/// typed into them are not turned into numbers.
pub fn build_template(style: TemplateStyle) -> Result<Vec<u8>, PipError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let text_format = Format::new().set_num_format("@");

    for (column, id) in FieldId::ALL.into_iter().enumerate() {
        let column = column as u16;
        let definition = id.definition();

        worksheet.write_string_with_format(0, column, definition.label, &header_format)?;
        worksheet.set_column_width(column, (definition.label.len() + 4).max(14) as f64)?;

        if definition.digits_only() {
            worksheet.set_column_format(column, &text_format)?;
        }

        if style == TemplateStyle::WithSample {
            worksheet.write_string(1, column, sample_value(id))?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

pub fn save_template(path: &Path, style: TemplateStyle) -> Result<(), PipError> {
    let bytes = build_template(style)?;
    std::fs::write(path, bytes)?;
    info!("Template saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::normalizer::{
            normalize_sheet,
            ColumnMapping,
        },
        spreadsheet::parse_sheet,
    };

    #[test]
    fn test_header_only_template_has_no_data_rows() {
        let bytes = build_template(TemplateStyle::HeaderOnly).unwrap();
        assert!(matches!(parse_sheet(DEFAULT_TEMPLATE_NAME, bytes), Err(PipError::EmptySheet)));
    }

    #[test]
    fn test_sample_template_round_trips_through_import() {
        let bytes = build_template(TemplateStyle::WithSample).unwrap();
        let sheet = parse_sheet(DEFAULT_TEMPLATE_NAME, bytes).unwrap();

        assert_eq!(sheet.name, TEMPLATE_SHEET_NAME);
        let labels: Vec<&str> = FieldId::ALL.iter().map(|id| id.label()).collect();
        assert_eq!(sheet.headers, labels);

        let mapping = ColumnMapping::resolve(&sheet.headers);
        assert!(mapping.unmatched().is_empty());

        let outcome = normalize_sheet(&sheet).unwrap();
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        for id in FieldId::ALL {
            assert_eq!(record.get(id), sample_value(id));
        }
        assert!(crate::core::form::validate_record(record).is_empty());
    }

    #[test]
    fn test_save_template_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_TEMPLATE_NAME);
        save_template(&path, TemplateStyle::HeaderOnly).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
