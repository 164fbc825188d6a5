use serde::Deserialize;

/// How strictly create/update bodies are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Missing strings become empty and a missing `completed` becomes `false`.
    #[default]
    Permissive,
    /// `title` and `description` must be present.
    Strict,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl FieldPolicy {
    pub fn apply(self, body: TodoBody) -> Result<TodoFields, String> {
        if self == Self::Strict {
            let missing: Vec<&str> = [
                ("title", body.title.is_none()),
                ("description", body.description.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            if !missing.is_empty() {
                return Err(format!("missing required field(s): {}", missing.join(", ")));
            }
        }
        Ok(TodoFields {
            title: body.title.unwrap_or_default(),
            description: body.description.unwrap_or_default(),
            completed: body.completed.unwrap_or(false),
        })
    }
}
