use std::sync::OnceLock;

use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::error;

/// Identifies one of the fixed PIP fields. Declaration order is the schema order
/// used for forms, tables, templates and the submitted JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Nik,
    Nisn,
    NamaLengkap,
    JenisKelamin,
    TempatTanggalLahir,
    NikIbu,
    NamaIbu,
    Emis,
    Npsn,
    JenisSekolah,
    NamaSekolah,
    KabKota,
    Provinsi,
    Bank,
    NoRekening,
    NamaRekening,
    Nominal,
    TahunPenerimaan,
}

pub const FIELD_COUNT: usize = 18;

impl FieldId {
    pub const ALL: [FieldId; FIELD_COUNT] = [
        FieldId::Nik,
        FieldId::Nisn,
        FieldId::NamaLengkap,
        FieldId::JenisKelamin,
        FieldId::TempatTanggalLahir,
        FieldId::NikIbu,
        FieldId::NamaIbu,
        FieldId::Emis,
        FieldId::Npsn,
        FieldId::JenisSekolah,
        FieldId::NamaSekolah,
        FieldId::KabKota,
        FieldId::Provinsi,
        FieldId::Bank,
        FieldId::NoRekening,
        FieldId::NamaRekening,
        FieldId::Nominal,
        FieldId::TahunPenerimaan,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The camelCase key used in the submitted JSON and by the receiver script.
    pub fn key(self) -> &'static str {
        match self {
            FieldId::Nik => "nik",
            FieldId::Nisn => "nisn",
            FieldId::NamaLengkap => "namaLengkap",
            FieldId::JenisKelamin => "jenisKelamin",
            FieldId::TempatTanggalLahir => "tempatTanggalLahir",
            FieldId::NikIbu => "nikIbu",
            FieldId::NamaIbu => "namaIbu",
            FieldId::Emis => "emis",
            FieldId::Npsn => "npsn",
            FieldId::JenisSekolah => "jenisSekolah",
            FieldId::NamaSekolah => "namaSekolah",
            FieldId::KabKota => "kabKota",
            FieldId::Provinsi => "provinsi",
            FieldId::Bank => "bank",
            FieldId::NoRekening => "noRekening",
            FieldId::NamaRekening => "namaRekening",
            FieldId::Nominal => "nominal",
            FieldId::TahunPenerimaan => "tahunPenerimaan",
        }
    }

    pub fn definition(self) -> &'static FieldDefinition {
        &FIELDS[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.definition().label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Identifiers and amounts kept as digit-only strings, never parsed to numbers.
    NumericText,
    Select,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub pattern: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: &'static [&'static str],
    pub rule: Option<Rule>,
    /// Written with a leading `'` by the receiver so the sheet keeps leading zeros.
    pub force_text: bool,
}

impl FieldDefinition {
    pub fn digits_only(&self) -> bool {
        self.kind == FieldKind::NumericText
    }

    pub fn is_select(&self) -> bool {
        self.kind == FieldKind::Select
    }

    /// Returns the error message for `value`, if any. The required check runs first
    /// and is the only error reported when it fails.
    pub fn check(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return if self.required { Some(format!("{} wajib diisi", self.label)) } else { None };
        }

        let rule = self.rule?;
        match rule_regex(self.id) {
            Some(re) if !re.is_match(value) => Some(rule.message.to_string()),
            _ => None,
        }
    }
}

fn rule_regex(id: FieldId) -> Option<&'static Regex> {
    static COMPILED: OnceLock<Vec<Option<Regex>>> = OnceLock::new();
    let compiled = COMPILED.get_or_init(|| {
        FIELDS
            .iter()
            .map(|field| {
                field.rule.and_then(|rule| {
                    Regex::new(rule.pattern)
                        .inspect_err(|e| error!("Invalid pattern for {}: {}", field.id.key(), e))
                        .ok()
                })
            })
            .collect()
    });
    compiled.get(id.index()).and_then(Option::as_ref)
}

const fn text(id: FieldId, label: &'static str, placeholder: &'static str) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        placeholder,
        kind: FieldKind::Text,
        required: true,
        options: &[],
        rule: None,
        force_text: false,
    }
}

const fn digits(
    id: FieldId,
    label: &'static str,
    placeholder: &'static str,
    pattern: &'static str,
    message: &'static str,
    force_text: bool,
) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        placeholder,
        kind: FieldKind::NumericText,
        required: true,
        options: &[],
        rule: Some(Rule { pattern, message }),
        force_text,
    }
}

const fn select(
    id: FieldId,
    label: &'static str,
    placeholder: &'static str,
    options: &'static [&'static str],
) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        placeholder,
        kind: FieldKind::Select,
        required: true,
        options,
        rule: None,
        force_text: false,
    }
}

pub static FIELDS: [FieldDefinition; FIELD_COUNT] = [
    digits(
        FieldId::Nik,
        "NIK (16 Digit)",
        "Masukkan 16 digit NIK",
        r"^[0-9]{16}$",
        "NIK harus 16 digit angka",
        true,
    ),
    digits(
        FieldId::Nisn,
        "NISN (10 Digit)",
        "Masukkan 10 digit NISN",
        r"^[0-9]{10}$",
        "NISN harus 10 digit angka",
        true,
    ),
    text(FieldId::NamaLengkap, "Nama Lengkap Siswa", "Sesuai Akta Kelahiran"),
    select(FieldId::JenisKelamin, "Jenis Kelamin", "Pilih Jenis Kelamin", &[
        "Laki-laki",
        "Perempuan",
    ]),
    text(FieldId::TempatTanggalLahir, "Tempat Tanggal Lahir", "Contoh: Jakarta, 01-01-2010"),
    digits(
        FieldId::NikIbu,
        "NIK Ibu Kandung",
        "Masukkan 16 digit NIK Ibu",
        r"^[0-9]{16}$",
        "NIK Ibu harus 16 digit angka",
        true,
    ),
    text(FieldId::NamaIbu, "Nama Ibu Kandung", "Sesuai Kartu Keluarga"),
    digits(
        FieldId::Emis,
        "No. Statistik EMIS",
        "Nomor Statistik EMIS (Hanya Angka)",
        r"^[0-9]+$",
        "No. EMIS hanya boleh berisi angka",
        true,
    ),
    digits(
        FieldId::Npsn,
        "NPSN Sekolah",
        "8 Digit NPSN",
        r"^[0-9]{8}$",
        "NPSN harus tepat 8 digit angka",
        true,
    ),
    select(FieldId::JenisSekolah, "Jenis Sekolah", "Pilih Jenis Sekolah", &["SMAK", "SMTK"]),
    text(FieldId::NamaSekolah, "Nama Satuan Pendidikan", "Nama Sekolah Lengkap"),
    text(FieldId::KabKota, "Kab/Kota Sekolah", "Contoh: Jakarta Selatan"),
    text(FieldId::Provinsi, "Provinsi Sekolah", "Contoh: DKI Jakarta"),
    text(FieldId::Bank, "Nama Bank Penyalur", "Contoh: BRI / BNI"),
    digits(
        FieldId::NoRekening,
        "Nomor Rekening",
        "Hanya Angka (Tanpa - atau spasi)",
        r"^[0-9]+$",
        "Nomor rekening hanya boleh angka (tidak boleh ada huruf, spasi, atau simbol)",
        true,
    ),
    text(FieldId::NamaRekening, "Nama di Rekening", "Sesuai Buku Tabungan"),
    digits(
        FieldId::Nominal,
        "Nominal Disalurkan",
        "Hanya Angka (Contoh: 750000)",
        r"^[0-9]+$",
        "Nominal hanya boleh angka (tanpa titik, koma, atau huruf)",
        false,
    ),
    select(FieldId::TahunPenerimaan, "Tahun Penerimaan", "Pilih Tahun", &["2024", "2025"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_order_matches_ids() {
        for (position, field) in FIELDS.iter().enumerate() {
            assert_eq!(field.id.index(), position, "{} out of order", field.label);
            assert_eq!(FieldId::ALL[position], field.id);
        }
    }

    #[test]
    fn test_digit_fields() {
        let digit_keys: Vec<&str> =
            FIELDS.iter().filter(|f| f.digits_only()).map(|f| f.id.key()).collect();
        assert_eq!(digit_keys, ["nik", "nisn", "nikIbu", "emis", "npsn", "noRekening", "nominal"]);

        // Nominal is digit-only but stays numeric on the sheet
        assert!(!FieldId::Nominal.definition().force_text);
        assert!(FieldId::NoRekening.definition().force_text);
    }

    #[test]
    fn test_check_reports_required_before_rule() {
        let nik = FieldId::Nik.definition();
        assert_eq!(nik.check(""), Some("NIK (16 Digit) wajib diisi".to_string()));
        assert_eq!(nik.check("12345"), Some("NIK harus 16 digit angka".to_string()));
        assert_eq!(nik.check("3171012345678901"), None);

        let npsn = FieldId::Npsn.definition();
        assert!(npsn.check("1234567").is_some());
        assert!(npsn.check("12345678").is_none());

        let nama = FieldId::NamaLengkap.definition();
        assert!(nama.check("Budi").is_none());
    }

    #[test]
    fn test_every_rule_compiles() {
        for field in FIELDS.iter().filter(|f| f.rule.is_some()) {
            assert!(rule_regex(field.id).is_some(), "{} has no compiled rule", field.label);
        }
    }

    #[test]
    fn test_rules_accept_ascii_digits_only() {
        let nik = FieldId::Nik.definition();
        assert_eq!(nik.check("３１７１０１２３４５６７８９０１"), Some("NIK harus 16 digit angka".to_string()));
        assert!(nik.check("٣١٧١٠١٢٣٤٥٦٧٨٩٠١").is_some());
        assert!(FieldId::Npsn.definition().check("６９９１２３４５").is_some());
        assert!(FieldId::Nominal.definition().check("７５００００").is_some());
        assert!(FieldId::Nominal.definition().check("750000").is_none());
    }

    #[test]
    fn test_serde_uses_camel_case_keys() {
        let json = serde_json::to_string(&FieldId::TempatTanggalLahir).unwrap();
        assert_eq!(json, "\"tempatTanggalLahir\"");
        for id in FieldId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.key()));
        }
    }
}
