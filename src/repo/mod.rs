use std::path::PathBuf;

use thiserror::Error;

use crate::domain::todo::{Todo, TodoId};

pub mod json_file;
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error("todo id space is exhausted")]
    IdsExhausted,
    #[error("failed to read todo file {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("todo file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to write todo file {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Store contract shared by the in-memory and file-backed repositories.
///
/// Mutations either commit fully or leave the store as it was.
pub trait TodoRepository: Send {
    fn all(&self) -> Vec<Todo>;
    fn get(&self, id: TodoId) -> Result<Todo, StoreError>;
    fn add(&mut self, title: String, description: String) -> Result<Todo, StoreError>;
    fn update(
        &mut self,
        id: TodoId,
        title: String,
        description: String,
        completed: bool,
    ) -> Result<Todo, StoreError>;
    fn delete(&mut self, id: TodoId) -> Result<Todo, StoreError>;
}
