pub mod errors;
pub mod form;
pub mod http;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod queue;
pub mod receiver;
pub mod schema;
pub mod submission;
pub mod tasks;

pub use errors::PipError;
pub use form::EntryForm;
pub use models::Record;
pub use queue::Queue;
pub use schema::FieldId;
