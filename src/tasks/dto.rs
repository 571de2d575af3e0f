use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

// PUT bodies deserialize straight into the store's patch type.
pub use super::repo_types::TaskPatch as UpdateTaskRequest;
