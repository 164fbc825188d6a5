use super::{StoreError, TodoRepository};
use crate::domain::todo::{Todo, TodoId, TodoList};

#[derive(Default)]
pub struct InMemoryTodoRepo {
    list: TodoList,
}

impl InMemoryTodoRepo {
    pub fn with_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut repo = Self::default();
        for (title, description) in seed {
            if repo.list.push(title.into(), description.into()).is_none() {
                break;
            }
        }
        repo
    }
}

impl TodoRepository for InMemoryTodoRepo {
    fn all(&self) -> Vec<Todo> {
        self.list.items().to_vec()
    }

    fn get(&self, id: TodoId) -> Result<Todo, StoreError> {
        self.list.get(id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn add(&mut self, title: String, description: String) -> Result<Todo, StoreError> {
        self.list
            .push(title, description)
            .ok_or(StoreError::IdsExhausted)
    }

    fn update(
        &mut self,
        id: TodoId,
        title: String,
        description: String,
        completed: bool,
    ) -> Result<Todo, StoreError> {
        self.list
            .replace(id, title, description, completed)
            .ok_or(StoreError::NotFound(id))
    }

    fn delete(&mut self, id: TodoId) -> Result<Todo, StoreError> {
        self.list.remove(id).ok_or(StoreError::NotFound(id))
    }
}
