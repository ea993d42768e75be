use std::collections::BTreeMap;

use super::{
    schema::FieldId,
    Record,
};

pub type FieldErrors = BTreeMap<FieldId, String>;

/// Validates every field of `record`, returning one message per failing field.
pub fn validate_record(record: &Record) -> FieldErrors {
    FieldId::ALL
        .into_iter()
        .filter_map(|id| id.definition().check(record.get(id)).map(|message| (id, message)))
        .collect()
}

/// State behind the manual entry form: the pending record as typed and the
/// errors from the last submit attempt.
#[derive(Debug, Default, Clone)]
pub struct EntryForm {
    draft: Record,
    errors: FieldErrors,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.draft.get(id)
    }

    pub fn value_mut(&mut self, id: FieldId) -> &mut String {
        self.draft.field_mut(id)
    }

    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) {
        *self.draft.field_mut(id) = value.into();
        self.clear_error(id);
    }

    /// Called after a widget edits the draft in place.
    pub fn clear_error(&mut self, id: FieldId) {
        self.errors.remove(&id);
    }

    pub fn error(&self, id: FieldId) -> Option<&str> {
        self.errors.get(&id).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Revalidates the whole draft. On success returns the trimmed record and
    /// resets the form to blank; otherwise keeps the draft and stores the errors.
    pub fn submit(&mut self) -> Option<Record> {
        let record = self.draft.trimmed();
        self.errors = validate_record(&record);

        if self.errors.is_empty() {
            self.reset();
            Some(record)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.draft = Record::new();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_valid(form: &mut EntryForm) {
        let values = [
            (FieldId::Nik, "3171012345678901"),
            (FieldId::Nisn, "0051234567"),
            (FieldId::NamaLengkap, "Ester Sihombing"),
            (FieldId::JenisKelamin, "Perempuan"),
            (FieldId::TempatTanggalLahir, "Medan, 12-03-2008"),
            (FieldId::NikIbu, "1271015508800002"),
            (FieldId::NamaIbu, "Lina Sitorus"),
            (FieldId::Emis, "131212710001"),
            (FieldId::Npsn, "69912345"),
            (FieldId::JenisSekolah, "SMAK"),
            (FieldId::NamaSekolah, "SMAK Immanuel Medan"),
            (FieldId::KabKota, "Kota Medan"),
            (FieldId::Provinsi, "Sumatera Utara"),
            (FieldId::Bank, "BRI"),
            (FieldId::NoRekening, "012301000123456"),
            (FieldId::NamaRekening, "Ester Sihombing"),
            (FieldId::Nominal, "1800000"),
            (FieldId::TahunPenerimaan, "2025"),
        ];
        for (id, value) in values {
            form.set_value(id, value);
        }
    }

    #[test]
    fn test_valid_form_submits_and_resets() {
        let mut form = EntryForm::new();
        fill_valid(&mut form);
        form.set_value(FieldId::Bank, "  BNI  ");

        let record = form.submit().expect("form should be valid");
        assert_eq!(record.get(FieldId::Bank), "BNI");
        assert!(form.errors().is_empty());
        for id in FieldId::ALL {
            assert_eq!(form.value(id), "");
        }
    }

    #[test]
    fn test_missing_required_field_gives_one_error_then_succeeds() {
        let mut form = EntryForm::new();
        fill_valid(&mut form);
        form.set_value(FieldId::NamaIbu, "");

        assert!(form.submit().is_none());
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.error(FieldId::NamaIbu), Some("Nama Ibu Kandung wajib diisi"));
        // The draft is kept for correction
        assert_eq!(form.value(FieldId::Nik), "3171012345678901");

        form.set_value(FieldId::NamaIbu, "Lina Sitorus");
        assert!(form.error(FieldId::NamaIbu).is_none());

        assert!(form.submit().is_some());
        assert!(form.errors().is_empty());
        assert_eq!(form.value(FieldId::NamaIbu), "");
    }

    #[test]
    fn test_empty_required_pattern_field_reports_required_message_only() {
        let mut form = EntryForm::new();
        fill_valid(&mut form);
        form.set_value(FieldId::Nik, "");

        assert!(form.submit().is_none());
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.error(FieldId::Nik), Some("NIK (16 Digit) wajib diisi"));
    }

    #[test]
    fn test_errors_are_recomputed_on_every_submit() {
        let mut form = EntryForm::new();
        assert!(form.submit().is_none());
        assert_eq!(form.errors().len(), FieldId::ALL.len());

        fill_valid(&mut form);
        form.set_value(FieldId::Npsn, "1234");
        *form.value_mut(FieldId::Nisn) = "12".to_string();

        assert!(form.submit().is_none());
        let failing: Vec<FieldId> = form.errors().keys().copied().collect();
        assert_eq!(failing, [FieldId::Nisn, FieldId::Npsn]);
        assert_eq!(form.error(FieldId::Npsn), Some("NPSN harus tepat 8 digit angka"));
    }
}
