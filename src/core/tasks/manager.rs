use std::{
    path::PathBuf,
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;
use tracing::{
    error,
    info,
};

use super::TaskResult;
use crate::{
    core::{
        pipeline::import_file,
        submission::SubmissionClient,
        PipError,
        Record,
    },
    persistence::RemoteCleanupSettings,
    remote::{
        GeminiService,
        RemoteNormalizer,
    },
};

/// Runs imports and submissions off the UI thread. Results come back over a
/// channel drained once per frame by [`TaskManager::poll_results`].
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Result<Self, PipError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    pub fn import_file(&self, path: PathBuf, remote_cleanup: RemoteCleanupSettings) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let _ = sender.send(TaskResult::LoadingMessage("Reading spreadsheet...".to_string()));

            let result = runtime.block_on(async {
                let normalizer = remote_normalizer(&remote_cleanup).map_err(|e| e.to_string())?;
                if normalizer.is_some() {
                    let _ = sender
                        .send(TaskResult::LoadingMessage("Cleaning data remotely...".to_string()));
                }

                import_file(&path, normalizer.as_ref()).await.map_err(|e| e.to_string())
            });

            if let Err(e) = &result {
                error!("Import of {} failed: {}", path.display(), e);
            }
            let _ = sender.send(TaskResult::Import(result));
        });
    }

    pub fn submit(&self, records: Vec<Record>, destination: String) {
        let (sender, runtime) = self.task_context();
        let count = records.len();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                let client = SubmissionClient::http().map_err(|e| e.to_string())?;
                client.submit(&records, &destination).await.map_err(|e| e.to_string())
            });

            let _ = sender.send(TaskResult::Submission { count, result });
        });
    }
}

/// Remote cleanup runs only when enabled in settings and an API key is set.
fn remote_normalizer(
    settings: &RemoteCleanupSettings,
) -> Result<Option<RemoteNormalizer<GeminiService>>, PipError> {
    if !settings.enabled {
        return Ok(None);
    }

    match GeminiService::from_env(&settings.model)? {
        Some(service) => Ok(Some(RemoteNormalizer::new(service))),
        None => {
            info!("Remote cleanup enabled but no API key is set, skipping");
            Ok(None)
        }
    }
}
