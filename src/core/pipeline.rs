use std::{
    path::Path,
    time::Instant,
};

use tracing::info;

use super::{
    normalizer::normalize_sheet,
    schema::FieldId,
    PipError,
    Record,
};
use crate::{
    remote::{
        CompletionService,
        RemoteNormalizer,
        RemoteStatus,
    },
    spreadsheet::{
        parse_sheet,
        read_sheet,
        RawSheet,
    },
};

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub file_name: String,
    pub records: Vec<Record>,
    pub skipped_blank_rows: usize,
    pub unmatched_fields: Vec<FieldId>,
    /// `None` when remote cleanup was not enabled for this import.
    pub remote: Option<RemoteStatus>,
}

pub async fn import_file<S: CompletionService>(
    path: &Path,
    remote: Option<&RemoteNormalizer<S>>,
) -> Result<ImportReport, PipError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    info!("Importing {}", file_name);
    let sheet = read_sheet(path)?;
    ingest(file_name, sheet, remote).await
}

/// Runs the whole ingestion: parse, map headers, sanitize, then optionally
/// hand the batch to the remote normalizer. Any parse error rejects the file.
pub async fn import_bytes<S: CompletionService>(
    file_name: &str,
    bytes: Vec<u8>,
    remote: Option<&RemoteNormalizer<S>>,
) -> Result<ImportReport, PipError> {
    info!("Importing {} ({} bytes)", file_name, bytes.len());
    let sheet = parse_sheet(file_name, bytes)?;
    ingest(file_name.to_string(), sheet, remote).await
}

async fn ingest<S: CompletionService>(
    file_name: String,
    sheet: RawSheet,
    remote: Option<&RemoteNormalizer<S>>,
) -> Result<ImportReport, PipError> {
    let start = Instant::now();
    let outcome = normalize_sheet(&sheet)?;

    let (records, remote) = match remote {
        Some(normalizer) => {
            let cleaned = normalizer.clean(outcome.records).await;
            (cleaned.records, Some(cleaned.status))
        }
        None => (outcome.records, None),
    };

    info!("Imported {} records from {} in {:.2?}", records.len(), file_name, start.elapsed());

    Ok(ImportReport {
        file_name,
        records,
        skipped_blank_rows: outcome.skipped_blank_rows,
        unmatched_fields: outcome.unmatched_fields,
        remote,
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::remote::GeminiService;

    struct Uppercase;

    impl CompletionService for Uppercase {
        fn complete_json(&self, prompt: String) -> impl Future<Output = Result<String, PipError>> + Send {
            let reply = prompt
                .split_once("Data: ")
                .ok_or_else(|| PipError::Remote("no data".to_string()))
                .and_then(|(_, data)| {
                    let mut records: Vec<Record> = serde_json::from_str(data)?;
                    for record in &mut records {
                        record.nama_lengkap = record.nama_lengkap.to_uppercase();
                    }
                    Ok(serde_json::to_string(&records)?)
                });
            async move { reply }
        }
    }

    const CSV: &str = "NIK (16 Digit),Nama Lengkap Siswa,Jenis Kelamin\n\
                       3171.0123.4567.8901,rut,Perempuan\n\
                       ,,\n\
                       3171019876543210,daniel,Laki-laki\n";

    #[tokio::test]
    async fn test_import_without_remote() {
        let report = import_bytes::<GeminiService>("data.csv", CSV.as_bytes().to_vec(), None)
            .await
            .unwrap();

        assert_eq!(report.file_name, "data.csv");
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped_blank_rows, 1);
        assert_eq!(report.records[0].get(FieldId::Nik), "3171012345678901");
        assert!(report.remote.is_none());
        assert!(report.unmatched_fields.contains(&FieldId::Bank));
    }

    #[tokio::test]
    async fn test_import_with_remote_cleanup() {
        let normalizer = RemoteNormalizer::new(Uppercase);
        let report = import_bytes("data.csv", CSV.as_bytes().to_vec(), Some(&normalizer))
            .await
            .unwrap();

        assert_eq!(report.remote, Some(RemoteStatus::Applied));
        assert_eq!(report.records[1].get(FieldId::NamaLengkap), "DANIEL");
        assert_eq!(report.records[1].get(FieldId::Nik), "3171019876543210");
    }

    #[tokio::test]
    async fn test_rejected_file_queues_nothing() {
        let result = import_bytes::<GeminiService>("notes.txt", b"hello".to_vec(), None).await;
        assert!(matches!(result, Err(PipError::UnsupportedFileType(_))));

        let result =
            import_bytes::<GeminiService>("blank.csv", b"NIK,Nama\n,\n ,  \n".to_vec(), None).await;
        assert!(matches!(result, Err(PipError::EmptySheet)));
    }

    #[tokio::test]
    async fn test_import_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        std::fs::write(&path, CSV).unwrap();

        let report = import_file::<GeminiService>(&path, None).await.unwrap();
        assert_eq!(report.file_name, "upload.csv");
        assert_eq!(report.records.len(), 2);
    }
}
