use serde::{Deserialize, Serialize};

pub type TodoId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Ordered todo collection plus the id counter.
///
/// `next_id` only ever grows, so an id freed by `remove` is never handed out
/// again. This is the exact shape written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    next_id: TodoId,
    todos: Vec<Todo>,
}

impl Default for TodoList {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: Vec::new(),
        }
    }
}

impl TodoList {
    pub fn items(&self) -> &[Todo] {
        &self.todos
    }

    pub fn next_id(&self) -> TodoId {
        self.next_id
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Append a new todo. Returns `None` once the id space is used up.
    pub fn push(&mut self, title: String, description: String) -> Option<Todo> {
        let next_id = self.next_id.checked_add(1)?;
        let todo = Todo {
            id: self.next_id,
            title,
            description,
            completed: false,
        };
        self.next_id = next_id;
        self.todos.push(todo.clone());
        Some(todo)
    }

    pub fn replace(
        &mut self,
        id: TodoId,
        title: String,
        description: String,
        completed: bool,
    ) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.title = title;
        todo.description = description;
        todo.completed = completed;
        Some(todo.clone())
    }

    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let pos = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(pos))
    }

    /// Check the invariants a freshly loaded list must hold.
    pub fn check(&self) -> Result<(), String> {
        if self.next_id == 0 {
            return Err("nextId 0 is not allowed".to_string());
        }
        let mut seen = std::collections::HashSet::with_capacity(self.todos.len());
        for todo in &self.todos {
            if todo.id == 0 {
                return Err("todo id 0 is not allowed".to_string());
            }
            if !seen.insert(todo.id) {
                return Err(format!("duplicate todo id {}", todo.id));
            }
            if todo.id >= self.next_id {
                return Err(format!(
                    "nextId {} is not greater than todo id {}",
                    self.next_id, todo.id
                ));
            }
        }
        Ok(())
    }
}
