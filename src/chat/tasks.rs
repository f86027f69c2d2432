//! Rendered task snapshot
//!
//! The backend owns the tasks; this is the read-only copy the view shows,
//! replaced wholesale on every successful fetch. Each row keeps the title it
//! had before its first translation so repeated translations never compound.

use crate::backend::Task;
use crate::{Error, Result};

/// One rendered task row
#[derive(Debug, Clone)]
pub struct TaskRow {
    /// Backend task identifier
    pub id: i64,

    /// Completion flag
    pub completed: bool,

    /// Currently displayed title, possibly translated
    title: String,

    /// Title as first fetched, populated when the row is first translated
    original: Option<String>,
}

impl TaskRow {
    /// Displayed title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Untranslated title: the cached original if the row has been
    /// translated, otherwise the displayed title
    #[must_use]
    pub fn source_title(&self) -> &str {
        self.original.as_deref().unwrap_or(&self.title)
    }
}

impl From<Task> for TaskRow {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            completed: task.completed,
            title: task.title,
            original: None,
        }
    }
}

/// The rendered task list
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    rows: Vec<TaskRow>,
}

impl TaskList {
    /// Create an empty task list
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Replace the whole snapshot with freshly fetched tasks
    ///
    /// Translation caches are dropped with the old rows.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.rows = tasks.into_iter().map(TaskRow::from).collect();
    }

    /// Rows in display order
    #[must_use]
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Number of tasks shown
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no tasks are shown
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a freshly fetched task set matches the current rows,
    /// compared on id, untranslated title and completion
    #[must_use]
    pub fn same_tasks(&self, tasks: &[Task]) -> bool {
        self.rows.len() == tasks.len()
            && self.rows.iter().zip(tasks).all(|(row, task)| {
                row.id == task.id
                    && row.completed == task.completed
                    && row.source_title() == task.title
            })
    }

    /// Titles to submit for translation, untranslated form for every row
    #[must_use]
    pub fn source_titles(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.source_title().to_string())
            .collect()
    }

    /// Apply one translation per row, in order
    ///
    /// Rows keep their pre-translation title in the cache so a later
    /// translation starts from the same source text.
    ///
    /// # Errors
    ///
    /// Returns error without touching any title if the translation count
    /// does not match the row count.
    pub fn apply_translations(&mut self, translations: Vec<String>) -> Result<()> {
        if translations.len() != self.rows.len() {
            return Err(Error::Translation(format!(
                "expected {} translations, got {}",
                self.rows.len(),
                translations.len()
            )));
        }

        for (row, translated) in self.rows.iter_mut().zip(translations) {
            if row.original.is_none() {
                row.original = Some(row.title.clone());
            }
            row.title = translated;
        }
        Ok(())
    }

    /// Find a row by displayed title, exact match first, then substring,
    /// both case-insensitive
    #[must_use]
    pub fn find_by_title(&self, needle: &str) -> Option<&TaskRow> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row.title.to_lowercase() == needle)
            .or_else(|| {
                self.rows
                    .iter()
                    .find(|row| row.title.to_lowercase().contains(&needle))
            })
    }
}
