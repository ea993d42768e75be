pub mod gemini;

use std::future::Future;

pub use gemini::{
    api_key_from_env,
    GeminiService,
    DEFAULT_MODEL,
};
use tracing::{
    info,
    warn,
};

use crate::core::{
    schema::FieldId,
    PipError,
    Record,
};

/// A text-generation backend that answers a prompt with a JSON document.
pub trait CompletionService {
    fn complete_json(&self, prompt: String) -> impl Future<Output = Result<String, PipError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    Oversize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Applied,
    Skipped(SkipReason),
    /// The service failed or answered with something unusable; input kept as is.
    FellBack(String),
}

#[derive(Debug, Clone)]
pub struct CleanedBatch {
    pub records: Vec<Record>,
    pub status: RemoteStatus,
}

pub const DEFAULT_MAX_BATCH: usize = 100;

/// Asks a [`CompletionService`] to tidy categorical and free-text fields. The
/// output always has as many records as the input.
pub struct RemoteNormalizer<S: CompletionService> {
    service: S,
    max_batch: usize,
}

impl<S: CompletionService> RemoteNormalizer<S> {
    pub fn new(service: S) -> Self {
        Self { service, max_batch: DEFAULT_MAX_BATCH }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    pub async fn clean(&self, records: Vec<Record>) -> CleanedBatch {
        if records.is_empty() {
            return CleanedBatch { records, status: RemoteStatus::Skipped(SkipReason::Empty) };
        }
        if records.len() > self.max_batch {
            info!(
                "Skipping remote cleanup: {} records exceeds limit of {}",
                records.len(),
                self.max_batch
            );
            return CleanedBatch { records, status: RemoteStatus::Skipped(SkipReason::Oversize) };
        }

        match self.request(&records).await {
            Ok(cleaned) => {
                info!("Remote cleanup applied to {} records", cleaned.len());
                CleanedBatch { records: cleaned, status: RemoteStatus::Applied }
            }
            Err(e) => {
                warn!("Remote cleanup failed, keeping original records: {e}");
                CleanedBatch { records, status: RemoteStatus::FellBack(e.to_string()) }
            }
        }
    }

    async fn request(&self, records: &[Record]) -> Result<Vec<Record>, PipError> {
        let prompt = build_prompt(records)?;
        let reply = self.service.complete_json(prompt).await?;
        let cleaned: Vec<Record> = serde_json::from_str(reply.trim())?;

        if cleaned.len() != records.len() {
            return Err(PipError::Remote(format!(
                "expected {} items, got {}",
                records.len(),
                cleaned.len()
            )));
        }

        Ok(records.iter().zip(cleaned).map(|(original, cleaned)| merge(original, cleaned)).collect())
    }
}

pub fn build_prompt(records: &[Record]) -> Result<String, PipError> {
    let data = serde_json::to_string(records)?;
    Ok(format!(
        "Review and structure the following school PIP data.\n\
         - Ensure \"jenisKelamin\" is \"Laki-laki\" or \"Perempuan\".\n\
         - Ensure \"jenisSekolah\" is \"SMAK\" or \"SMTK\".\n\
         - Fix common typos in names or city names.\n\
         - Do not change any digits.\n\
         - Return the EXACT same number of items as provided in input, as a JSON array of objects with the same keys.\n\
         Data: {data}"
    ))
}

// Identifiers and amounts never come from the service
fn merge(original: &Record, cleaned: Record) -> Record {
    let mut merged = cleaned.trimmed();
    for id in FieldId::ALL.into_iter().filter(|id| id.definition().digits_only()) {
        merged.set(id, original.get(id));
    }
    merged
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
    };

    use super::*;

    struct ScriptedService {
        reply: Box<dyn Fn(&str) -> Result<String, PipError> + Send + Sync>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedService {
        fn new(reply: impl Fn(&str) -> Result<String, PipError> + Send + Sync + 'static) -> Self {
            Self { reply: Box::new(reply), calls: Arc::new(AtomicUsize::new(0)) }
        }
    }

    impl CompletionService for ScriptedService {
        fn complete_json(&self, prompt: String) -> impl Future<Output = Result<String, PipError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = (self.reply)(&prompt);
            async move { reply }
        }
    }

    fn student(name: &str, gender: &str) -> Record {
        let mut record = Record::new();
        record.set(FieldId::Nik, "3171012345678901");
        record.set(FieldId::NamaLengkap, name);
        record.set(FieldId::JenisKelamin, gender);
        record.set(FieldId::Nominal, "750000");
        record
    }

    fn batch(count: usize) -> Vec<Record> {
        (0..count).map(|i| student(&format!("Siswa {i}"), "L")).collect()
    }

    #[tokio::test]
    async fn test_applies_cleanup_and_restores_digits() {
        let service = ScriptedService::new(|_| {
            Ok(r#"[{"nik":"3171012345678999","namaLengkap":" Yohana Simbolon ","jenisKelamin":"Perempuan","nominal":"1"}]"#.to_string())
        });
        let normalizer = RemoteNormalizer::new(service);

        let result = normalizer.clean(vec![student("yohana simbolon", "P")]).await;
        assert_eq!(result.status, RemoteStatus::Applied);

        let record = &result.records[0];
        assert_eq!(record.get(FieldId::NamaLengkap), "Yohana Simbolon");
        assert_eq!(record.get(FieldId::JenisKelamin), "Perempuan");
        assert_eq!(record.get(FieldId::Nik), "3171012345678901");
        assert_eq!(record.get(FieldId::Nominal), "750000");
    }

    #[tokio::test]
    async fn test_count_mismatch_falls_back_to_input() {
        let input = batch(5);
        let service = ScriptedService::new(|prompt| {
            let start = prompt.find("Data: ").unwrap() + "Data: ".len();
            let mut records: Vec<Record> = serde_json::from_str(&prompt[start..]).unwrap();
            records.pop();
            Ok(serde_json::to_string(&records).unwrap())
        });
        let normalizer = RemoteNormalizer::new(service);

        let result = normalizer.clean(input.clone()).await;
        assert!(matches!(result.status, RemoteStatus::FellBack(_)));
        assert_eq!(result.records, input);
    }

    #[tokio::test]
    async fn test_service_error_and_garbage_fall_back() {
        let input = batch(2);

        let failing = RemoteNormalizer::new(ScriptedService::new(|_| Err(PipError::Remote("quota".to_string()))));
        let result = failing.clean(input.clone()).await;
        assert_eq!(result.status, RemoteStatus::FellBack("Remote service error: quota".to_string()));
        assert_eq!(result.records, input);

        let garbage = RemoteNormalizer::new(ScriptedService::new(|_| Ok("not json".to_string())));
        let result = garbage.clean(input.clone()).await;
        assert!(matches!(result.status, RemoteStatus::FellBack(_)));
        assert_eq!(result.records, input);
    }

    #[tokio::test]
    async fn test_empty_and_oversize_batches_skip_service() {
        let service = ScriptedService::new(|_| Ok("[]".to_string()));
        let calls = service.calls.clone();
        let normalizer = RemoteNormalizer::new(service).with_max_batch(3);

        let empty = normalizer.clean(Vec::new()).await;
        assert_eq!(empty.status, RemoteStatus::Skipped(SkipReason::Empty));

        let large = normalizer.clean(batch(4)).await;
        assert_eq!(large.status, RemoteStatus::Skipped(SkipReason::Oversize));
        assert_eq!(large.records.len(), 4);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prompt_embeds_batch() {
        let prompt = build_prompt(&batch(1)).unwrap();
        assert!(prompt.contains("\"Laki-laki\" or \"Perempuan\""));
        assert!(prompt.contains("\"SMAK\" or \"SMTK\""));
        assert!(prompt.ends_with("\"tahunPenerimaan\":\"\"}]"));
    }
}
