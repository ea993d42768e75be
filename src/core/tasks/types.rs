use crate::core::{
    pipeline::ImportReport,
    submission::SubmitReceipt,
};

pub type ImportResult = Result<ImportReport, String>;
pub type SubmissionResult = Result<SubmitReceipt, String>;

#[derive(Debug, Clone)]
pub enum TaskResult {
    LoadingMessage(String),
    Import(ImportResult),
    /// `count` is the queue length when the submission started.
    Submission { count: usize, result: SubmissionResult },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::LoadingMessage(_) => "loading_message",
            TaskResult::Import(_) => "import",
            TaskResult::Submission { .. } => "submission",
        }
    }
}
