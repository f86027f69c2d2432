//! Natural-language command synthesis
//!
//! Task actions are not performed locally; each one becomes a command string
//! the backend interprets, sent through the ordinary chat pipeline.

use super::tasks::TaskRow;

/// Command listing every task
pub const SHOW_TASKS: &str = "Show all my tasks";

/// Command removing all completed tasks
pub const CLEAR_COMPLETED: &str = "Delete all completed tasks";

/// Command marking a task complete
#[must_use]
pub fn complete(title: &str) -> String {
    format!("Mark \"{title}\" as complete")
}

/// Command renaming a task
#[must_use]
pub fn rename(title: &str, new_title: &str) -> String {
    format!("Update task \"{title}\" to \"{new_title}\"")
}

/// Command deleting a task
#[must_use]
pub fn delete(title: &str) -> String {
    format!("Delete task \"{title}\"")
}

/// Command adding a new task
#[must_use]
pub fn add(text: &str) -> String {
    format!("Add task: {text}")
}

/// Spoken summary of the rendered task list
#[must_use]
pub fn spoken_summary(rows: &[TaskRow]) -> String {
    if rows.is_empty() {
        return "No tasks available".to_string();
    }

    let plural = if rows.len() == 1 { "" } else { "s" };
    let mut text = format!("You have {} task{plural}. ", rows.len());
    for (index, row) in rows.iter().enumerate() {
        let status = if row.completed { "completed" } else { "pending" };
        text.push_str(&format!(
            "Task {}: {}, status {status}. ",
            index + 1,
            row.title()
        ));
    }
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Task;
    use crate::chat::TaskList;

    fn rows(titles: &[(&str, bool)]) -> TaskList {
        let mut list = TaskList::default();
        list.replace(
            titles
                .iter()
                .enumerate()
                .map(|(i, (title, completed))| Task {
                    id: i64::try_from(i).unwrap() + 1,
                    title: (*title).to_string(),
                    completed: *completed,
                })
                .collect(),
        );
        list
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(complete("Buy milk"), "Mark \"Buy milk\" as complete");
        assert_eq!(
            rename("Buy milk", "Buy oat milk"),
            "Update task \"Buy milk\" to \"Buy oat milk\""
        );
        assert_eq!(delete("Buy milk"), "Delete task \"Buy milk\"");
        assert_eq!(add("call the vet"), "Add task: call the vet");
    }

    #[test]
    fn test_spoken_summary_empty() {
        assert_eq!(spoken_summary(&[]), "No tasks available");
    }

    #[test]
    fn test_spoken_summary_singular() {
        let list = rows(&[("Buy milk", false)]);
        assert_eq!(
            spoken_summary(list.rows()),
            "You have 1 task. Task 1: Buy milk, status pending."
        );
    }

    #[test]
    fn test_spoken_summary_statuses() {
        let list = rows(&[("Buy milk", false), ("Walk the dog", true)]);
        assert_eq!(
            spoken_summary(list.rows()),
            "You have 2 tasks. Task 1: Buy milk, status pending. \
             Task 2: Walk the dog, status completed."
        );
    }
}
