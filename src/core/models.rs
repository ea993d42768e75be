use serde::{
    Deserialize,
    Serialize,
};

use super::schema::FieldId;

/// One normalized PIP entry. Every field is trimmed text, including identifiers
/// and amounts, so long numbers never lose precision. Serializes with the
/// camelCase keys in schema order; missing keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    pub nik: String,
    pub nisn: String,
    pub nama_lengkap: String,
    pub jenis_kelamin: String,
    pub tempat_tanggal_lahir: String,
    pub nik_ibu: String,
    pub nama_ibu: String,
    pub emis: String,
    pub npsn: String,
    pub jenis_sekolah: String,
    pub nama_sekolah: String,
    pub kab_kota: String,
    pub provinsi: String,
    pub bank: String,
    pub no_rekening: String,
    pub nama_rekening: String,
    pub nominal: String,
    pub tahun_penerimaan: String,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: FieldId) -> &str {
        match id {
            FieldId::Nik => &self.nik,
            FieldId::Nisn => &self.nisn,
            FieldId::NamaLengkap => &self.nama_lengkap,
            FieldId::JenisKelamin => &self.jenis_kelamin,
            FieldId::TempatTanggalLahir => &self.tempat_tanggal_lahir,
            FieldId::NikIbu => &self.nik_ibu,
            FieldId::NamaIbu => &self.nama_ibu,
            FieldId::Emis => &self.emis,
            FieldId::Npsn => &self.npsn,
            FieldId::JenisSekolah => &self.jenis_sekolah,
            FieldId::NamaSekolah => &self.nama_sekolah,
            FieldId::KabKota => &self.kab_kota,
            FieldId::Provinsi => &self.provinsi,
            FieldId::Bank => &self.bank,
            FieldId::NoRekening => &self.no_rekening,
            FieldId::NamaRekening => &self.nama_rekening,
            FieldId::Nominal => &self.nominal,
            FieldId::TahunPenerimaan => &self.tahun_penerimaan,
        }
    }

    /// Mutable access for input widgets. Values written here are not trimmed;
    /// call [`Record::trimmed`] before queueing.
    pub fn field_mut(&mut self, id: FieldId) -> &mut String {
        match id {
            FieldId::Nik => &mut self.nik,
            FieldId::Nisn => &mut self.nisn,
            FieldId::NamaLengkap => &mut self.nama_lengkap,
            FieldId::JenisKelamin => &mut self.jenis_kelamin,
            FieldId::TempatTanggalLahir => &mut self.tempat_tanggal_lahir,
            FieldId::NikIbu => &mut self.nik_ibu,
            FieldId::NamaIbu => &mut self.nama_ibu,
            FieldId::Emis => &mut self.emis,
            FieldId::Npsn => &mut self.npsn,
            FieldId::JenisSekolah => &mut self.jenis_sekolah,
            FieldId::NamaSekolah => &mut self.nama_sekolah,
            FieldId::KabKota => &mut self.kab_kota,
            FieldId::Provinsi => &mut self.provinsi,
            FieldId::Bank => &mut self.bank,
            FieldId::NoRekening => &mut self.no_rekening,
            FieldId::NamaRekening => &mut self.nama_rekening,
            FieldId::Nominal => &mut self.nominal,
            FieldId::TahunPenerimaan => &mut self.tahun_penerimaan,
        }
    }

    pub fn set(&mut self, id: FieldId, value: &str) {
        *self.field_mut(id) = value.trim().to_string();
    }

    pub fn trimmed(&self) -> Self {
        let mut record = Record::new();
        for id in FieldId::ALL {
            record.set(id, self.get(id));
        }
        record
    }

    pub fn blank_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        FieldId::ALL.into_iter().filter(|&id| self.get(id).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_all_keys_in_schema_order() {
        let mut record = Record::new();
        record.set(FieldId::Nik, " 3171012345678901 ");
        record.set(FieldId::NamaLengkap, "Maria Tamba");

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: Vec<&str> = FieldId::ALL.iter().map(|id| id.key()).collect();

        // serde_json without preserve_order sorts keys, so compare as sets here
        let mut sorted_expected = expected.clone();
        sorted_expected.sort_unstable();
        assert_eq!(keys, sorted_expected);

        let text = serde_json::to_string(&record).unwrap();
        assert!(text.starts_with("{\"nik\":\"3171012345678901\",\"nisn\":\"\""));
        assert!(text.ends_with("\"tahunPenerimaan\":\"\"}"));
        assert_eq!(json["namaLengkap"], "Maria Tamba");
    }

    #[test]
    fn test_deserialize_fills_missing_and_ignores_unknown() {
        let record: Record =
            serde_json::from_str(r#"{"nik":"1","jenisKelamin":"Perempuan","extra":"x"}"#).unwrap();
        assert_eq!(record.get(FieldId::Nik), "1");
        assert_eq!(record.get(FieldId::JenisKelamin), "Perempuan");
        assert_eq!(record.get(FieldId::Bank), "");
        assert_eq!(record.blank_fields().count(), 16);
    }

    #[test]
    fn test_trimmed_and_blank_fields() {
        let mut record = Record::new();
        assert_eq!(record.blank_fields().count(), FieldId::ALL.len());

        *record.field_mut(FieldId::Bank) = "  BRI ".to_string();
        assert_eq!(record.blank_fields().count(), FieldId::ALL.len() - 1);
        assert_eq!(record.trimmed().get(FieldId::Bank), "BRI");
    }
}
