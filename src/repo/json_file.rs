use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{StoreError, TodoRepository};
use crate::domain::todo::{Todo, TodoId, TodoList};

/// Durable repository backed by a single JSON snapshot file.
///
/// Every mutation is applied to a copy of the list, written to disk, and
/// only then swapped in, so the in-memory state always matches the last
/// snapshot that made it to disk.
pub struct JsonFileTodoRepo {
    path: PathBuf,
    list: TodoList,
}

impl JsonFileTodoRepo {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Load {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let list = load(&path)?;
        tracing::info!(
            path = %path.display(),
            todos = list.items().len(),
            next_id = list.next_id(),
            "loaded todo store"
        );
        Ok(Self { path, list })
    }

    fn commit(&mut self, next: TodoList) -> Result<(), StoreError> {
        persist(&self.path, &next)?;
        self.list = next;
        Ok(())
    }
}

impl TodoRepository for JsonFileTodoRepo {
    fn all(&self) -> Vec<Todo> {
        self.list.items().to_vec()
    }

    fn get(&self, id: TodoId) -> Result<Todo, StoreError> {
        self.list.get(id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn add(&mut self, title: String, description: String) -> Result<Todo, StoreError> {
        let mut next = self.list.clone();
        let todo = next
            .push(title, description)
            .ok_or(StoreError::IdsExhausted)?;
        self.commit(next)?;
        Ok(todo)
    }

    fn update(
        &mut self,
        id: TodoId,
        title: String,
        description: String,
        completed: bool,
    ) -> Result<Todo, StoreError> {
        if self.list.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        let mut next = self.list.clone();
        let todo = next
            .replace(id, title, description, completed)
            .ok_or(StoreError::NotFound(id))?;
        self.commit(next)?;
        Ok(todo)
    }

    fn delete(&mut self, id: TodoId) -> Result<Todo, StoreError> {
        if self.list.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        let mut next = self.list.clone();
        let todo = next.remove(id).ok_or(StoreError::NotFound(id))?;
        self.commit(next)?;
        Ok(todo)
    }
}

fn load(path: &Path) -> Result<TodoList, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no todo file yet, starting empty");
            return Ok(TodoList::default());
        }
        Err(source) => {
            return Err(StoreError::Load {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };
    let list: TodoList = serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?;
    list.check().map_err(corrupt)?;
    Ok(list)
}

/// Write the snapshot to a `.tmp` sibling and rename it over `path`.
fn persist(path: &Path, list: &TodoList) -> Result<(), StoreError> {
    let fail = |source: std::io::Error| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_vec_pretty(list).map_err(|e| fail(e.into()))?;
    let tmp = path.with_extension("json.tmp");

    let mut file = File::create(&tmp).map_err(fail)?;
    file.write_all(&json).map_err(fail)?;
    file.sync_all().map_err(fail)?;
    drop(file);

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(fail(e));
    }
    // The new snapshot is already in place; a failed directory sync only
    // weakens durability of the rename.
    if let Err(e) = sync_parent(path) {
        tracing::warn!(path = %path.display(), error = %e, "failed to sync todo directory");
    }
    tracing::debug!(
        path = %path.display(),
        todos = list.items().len(),
        "persisted todo snapshot"
    );
    Ok(())
}

/// Flush the directory entry so the rename itself survives a power loss.
#[cfg(unix)]
fn sync_parent(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
