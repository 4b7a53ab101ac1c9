//! Todo list state.
//!
//! The list is a plain value updated through `reduce`, which returns the
//! next state or an error leaving the previous one untouched.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::{invalid, Error, Result};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Work", "Personal", "Shopping"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[strum(serialize = "low")]
    Low,
    #[default]
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "high")]
    High,
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(invalid(format!("unknown priority \"{}\"", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Filter {
    #[default]
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "active")]
    Active,
    #[strum(serialize = "completed")]
    Completed,
}

impl Filter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            _ => Err(invalid(format!("unknown filter \"{}\"", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add {
        text: String,
        category: Option<String>,
        priority: Priority,
        created_at: DateTime<Utc>,
    },
    Toggle(u64),
    Delete(u64),
    Edit {
        id: u64,
        text: String,
    },
    SetPriority {
        id: u64,
        priority: Priority,
    },
    AddCategory(String),
    ClearCompleted,
    /// Replaces the todos, merging their categories into the known ones
    Import(Vec<Todo>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
    pub categories: Vec<String>,
}

impl Default for TodoList {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an action, returning the next state
    ///
    /// # Errors
    /// `ValidationError` when a text is empty or an id does not exist
    pub fn reduce(mut self, action: Action) -> Result<Self> {
        match action {
            Action::Add {
                text,
                category,
                priority,
                created_at,
            } => {
                let text = non_empty(&text)?;
                let category = category
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                let todo = Todo {
                    id: self.next_id(),
                    text,
                    completed: false,
                    category,
                    created_at,
                    priority,
                };
                self.todos.insert(0, todo);
            }
            Action::Toggle(id) => {
                let todo = self.find_mut(id)?;
                todo.completed = !todo.completed;
            }
            Action::Delete(id) => {
                self.find_mut(id)?;
                self.todos.retain(|todo| todo.id != id);
            }
            Action::Edit { id, text } => {
                let text = non_empty(&text)?;
                self.find_mut(id)?.text = text;
            }
            Action::SetPriority { id, priority } => {
                self.find_mut(id)?.priority = priority;
            }
            Action::AddCategory(category) => {
                let category = non_empty(&category)?;
                self.add_category(category);
            }
            Action::ClearCompleted => self.todos.retain(|todo| !todo.completed),
            Action::Import(todos) => {
                for todo in &todos {
                    self.add_category(todo.category.clone());
                }
                self.todos = todos;
            }
        }
        Ok(self)
    }

    /// The todos matching the filter, in list order
    pub fn filtered(&self, filter: Filter) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(move |todo| filter.matches(todo))
    }

    pub fn active_count(&self) -> usize {
        self.filtered(Filter::Active).count()
    }

    pub fn completed_count(&self) -> usize {
        self.filtered(Filter::Completed).count()
    }

    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Serializes the todos (without categories) as pretty printed JSON
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.todos)?)
    }

    /// Parses an exported JSON array of todos
    pub fn parse_import(json: &str) -> Result<Vec<Todo>> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_array() {
            return Err(invalid("expected a JSON array of todos"));
        }
        Ok(serde_json::from_value(value)?)
    }

    fn next_id(&self) -> u64 {
        self.todos.iter().map(|todo| todo.id).max().map_or(1, |max| max + 1)
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| invalid(format!("no todo with id {}", id)))
    }

    fn add_category(&mut self, category: String) {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }
}

fn non_empty(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid("task cannot be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn add(text: &str) -> Action {
        Action::Add {
            text: text.to_string(),
            category: None,
            priority: Priority::Medium,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn list_with(texts: &[&str]) -> TodoList {
        texts
            .iter()
            .try_fold(TodoList::new(), |list, text| list.reduce(add(text)))
            .unwrap()
    }

    #[test]
    fn test_add_puts_new_todos_first() {
        let list = list_with(&["first", "  second  "]);
        let texts: Vec<&str> = list.todos.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(list.todos[0].id, 2);
        assert_eq!(list.todos[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_ids_continue_after_deletions() {
        let list = list_with(&["a", "b", "c"]).reduce(Action::Delete(1)).unwrap();
        let list = list.reduce(add("d")).unwrap();
        assert_eq!(list.todos[0].id, 4);
    }

    #[test]
    fn test_toggle_filter_and_clear() {
        let list = list_with(&["a", "b", "c"]).reduce(Action::Toggle(2)).unwrap();
        assert_eq!(list.active_count(), 2);
        assert_eq!(list.completed_count(), 1);
        assert_eq!(list.filtered(Filter::Completed).next().unwrap().text, "b");

        let list = list.reduce(Action::ClearCompleted).unwrap();
        assert_eq!(list.todos.len(), 2);
        assert!(list.get(2).is_none());
    }

    #[test]
    fn test_invalid_actions() {
        let list = list_with(&["a"]);
        assert!(matches!(list.clone().reduce(add("   ")), Err(Error::ValidationError(_))));
        assert!(list.clone().reduce(Action::Toggle(42)).is_err());
        assert!(list
            .clone()
            .reduce(Action::Edit {
                id: 1,
                text: String::new()
            })
            .is_err());
        let edited = list
            .reduce(Action::Edit {
                id: 1,
                text: "renamed".to_string(),
            })
            .unwrap();
        assert_eq!(edited.get(1).unwrap().text, "renamed");
    }

    #[test]
    fn test_categories() {
        let list = TodoList::new()
            .reduce(Action::AddCategory("Garden".to_string()))
            .unwrap()
            .reduce(Action::AddCategory("Work".to_string()))
            .unwrap();
        assert_eq!(list.categories, vec!["Work", "Personal", "Shopping", "Garden"]);
    }

    #[test]
    fn test_export_import() {
        let list = list_with(&["a", "b"])
            .reduce(Action::SetPriority {
                id: 1,
                priority: Priority::High,
            })
            .unwrap();
        let json = list.export_json().unwrap();
        assert!(json.contains("\"createdAt\""));

        let todos = TodoList::parse_import(&json).unwrap();
        let imported = TodoList::new().reduce(Action::Import(todos)).unwrap();
        assert_eq!(imported.todos, list.todos);
        assert!(imported.categories.contains(&UNCATEGORIZED.to_string()));

        assert!(matches!(
            TodoList::parse_import("{\"id\": 1}"),
            Err(Error::ValidationError(_))
        ));
    }
}
