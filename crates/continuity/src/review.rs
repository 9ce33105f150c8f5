//! Interactive review of a draft before anything is written.
//!
//! Every change goes through [`PageDraft::apply`]; this module only collects
//! input and reports rejected edits.

use std::io;

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use continuity::draft::{DEFAULT_NEW_TASK_CATEGORY, EDITABLE_CATEGORIES};
use continuity::{render_draft, ContinuityError, EditCommand, PageDraft, TaskPriority};

use crate::ui;

const MENU: [&str; 7] = [
    "Preview page",
    "Edit tasks",
    "Edit feature jobs",
    "Add task",
    "Remove task",
    "Approve and publish",
    "Cancel",
];

const PRIORITY_CHOICES: [&str; 4] = ["High", "Medium", "Low", "None"];

/// Walk the user through the draft. Returns the approved draft, or
/// [`ContinuityError::UserCancelled`].
pub fn review(mut draft: PageDraft) -> Result<PageDraft> {
    let theme = ColorfulTheme::default();

    loop {
        println!();
        let choice = prompt(
            Select::with_theme(&theme)
                .with_prompt("What would you like to do?")
                .default(0)
                .items(&MENU)
                .interact(),
        )?;

        match choice {
            0 => {
                ui::print_section("👀 Page Preview");
                println!("{}", render_draft(&draft, draft.built_on()));
            }
            1 => edit_tasks(&theme, &mut draft)?,
            2 => edit_jobs(&theme, &mut draft)?,
            3 => add_task(&theme, &mut draft)?,
            4 => remove_task(&theme, &mut draft)?,
            5 => {
                ui::print_approval_summary(&draft);
                let approved = prompt(
                    Confirm::with_theme(&theme)
                        .with_prompt("Create this page?")
                        .default(true)
                        .interact(),
                )?;
                if approved {
                    return Ok(draft);
                }
            }
            _ => {
                let cancel = prompt(
                    Confirm::with_theme(&theme)
                        .with_prompt("Cancel without creating anything?")
                        .default(false)
                        .interact(),
                )?;
                if cancel {
                    return Err(ContinuityError::UserCancelled.into());
                }
            }
        }
    }
}

fn edit_tasks(theme: &ColorfulTheme, draft: &mut PageDraft) -> Result<()> {
    ui::print_section("✏️  Edit Tasks");
    ui::print_task_listing(draft);
    if draft.tasks().is_empty() {
        return Ok(());
    }

    let Some(indices) = ask_numbers(theme, "Task numbers (e.g. 1,3)")? else {
        return Ok(());
    };

    let action = prompt(
        Select::with_theme(theme)
            .with_prompt("Action")
            .default(0)
            .items(&["Remove", "Change priority", "Change category", "Back"])
            .interact(),
    )?;

    let command = match action {
        0 => EditCommand::RemoveTasks { indices },
        1 => EditCommand::SetPriority {
            indices,
            priority: ask_priority(theme, 1)?,
        },
        2 => {
            let category = prompt(
                Select::with_theme(theme)
                    .with_prompt("New category")
                    .default(0)
                    .items(&EDITABLE_CATEGORIES)
                    .interact(),
            )?;
            EditCommand::SetCategory {
                indices,
                category: EDITABLE_CATEGORIES[category].to_string(),
            }
        }
        _ => return Ok(()),
    };
    apply(draft, command);
    Ok(())
}

fn edit_jobs(theme: &ColorfulTheme, draft: &mut PageDraft) -> Result<()> {
    ui::print_section("💼 Edit Feature Jobs");
    ui::print_job_listing(draft);
    if draft.jobs().is_empty() {
        return Ok(());
    }

    let action = prompt(
        Select::with_theme(theme)
            .with_prompt("Action")
            .default(0)
            .items(&["Remove jobs", "Reorder by score", "Back"])
            .interact(),
    )?;

    match action {
        0 => {
            if let Some(indices) = ask_numbers(theme, "Job numbers (e.g. 2,4)")? {
                apply(draft, EditCommand::RemoveJobs { indices });
            }
        }
        1 => apply(draft, EditCommand::ReorderJobs),
        _ => {}
    }
    Ok(())
}

fn add_task(theme: &ColorfulTheme, draft: &mut PageDraft) -> Result<()> {
    let name: String = prompt(
        Input::with_theme(theme)
            .with_prompt("Task name")
            .allow_empty(true)
            .interact_text(),
    )?;

    let default_category = EDITABLE_CATEGORIES
        .iter()
        .position(|c| *c == DEFAULT_NEW_TASK_CATEGORY)
        .unwrap_or(0);
    let category = prompt(
        Select::with_theme(theme)
            .with_prompt("Category")
            .default(default_category)
            .items(&EDITABLE_CATEGORIES)
            .interact(),
    )?;

    let command = EditCommand::AddTask {
        name,
        category: EDITABLE_CATEGORIES[category].to_string(),
        priority: ask_priority(theme, 1)?,
    };
    apply(draft, command);
    Ok(())
}

fn remove_task(theme: &ColorfulTheme, draft: &mut PageDraft) -> Result<()> {
    let query: String = prompt(
        Input::with_theme(theme)
            .with_prompt("Search task name")
            .interact_text(),
    )?;

    let matches = draft.find_tasks(&query);
    let listed = draft.listed_tasks();
    let index = match matches.as_slice() {
        [] => {
            ui::print_warning(&format!("No task matches '{query}'"));
            return Ok(());
        }
        [only] => *only,
        many => {
            let names: Vec<&str> = many.iter().map(|&i| listed[i].name.as_str()).collect();
            let picked = prompt(
                Select::with_theme(theme)
                    .with_prompt("Which task?")
                    .default(0)
                    .items(&names)
                    .interact(),
            )?;
            many[picked]
        }
    };

    let name = listed[index].name.clone();
    let confirmed = prompt(
        Confirm::with_theme(theme)
            .with_prompt(format!("Remove '{name}'?"))
            .default(false)
            .interact(),
    )?;
    if confirmed {
        apply(draft, EditCommand::RemoveTasks { indices: vec![index] });
    }
    Ok(())
}

fn ask_priority(theme: &ColorfulTheme, default: usize) -> Result<Option<TaskPriority>> {
    let picked = prompt(
        Select::with_theme(theme)
            .with_prompt("Priority")
            .default(default)
            .items(&PRIORITY_CHOICES)
            .interact(),
    )?;
    Ok(TaskPriority::parse(PRIORITY_CHOICES[picked]))
}

/// Prompt for a number list; `None` when the input does not parse.
fn ask_numbers(theme: &ColorfulTheme, label: &str) -> Result<Option<Vec<usize>>> {
    let raw: String = prompt(
        Input::with_theme(theme)
            .with_prompt(label)
            .interact_text(),
    )?;
    match parse_numbers(&raw) {
        Ok(indices) => Ok(Some(indices)),
        Err(message) => {
            ui::print_error(&message);
            Ok(None)
        }
    }
}

/// Turn "1, 3,3" into 0-based `[0, 2]`. Range checks are left to the draft.
fn parse_numbers(raw: &str) -> Result<Vec<usize>, String> {
    let mut indices = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<usize>() {
            Ok(n) if n >= 1 => {
                if !indices.contains(&(n - 1)) {
                    indices.push(n - 1);
                }
            }
            _ => return Err(format!("'{token}' is not a valid number")),
        }
    }
    Ok(indices)
}

/// Unwrap a prompt result; Ctrl-C at a prompt cancels the review.
fn prompt<T>(result: Result<T, dialoguer::Error>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::Interrupted => {
            Err(ContinuityError::UserCancelled.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn apply(draft: &mut PageDraft, command: EditCommand) {
    match draft.clone().apply(command) {
        Ok(next) => {
            *draft = next;
            ui::print_success("Draft updated");
        }
        Err(err) => ui::print_error(&err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("1, 3,3"), Ok(vec![0, 2]));
        assert_eq!(parse_numbers(" 2 ,"), Ok(vec![1]));
        assert_eq!(parse_numbers(""), Ok(vec![]));
        assert!(parse_numbers("0").is_err());
        assert!(parse_numbers("1,x").is_err());
    }

    #[test]
    fn test_interrupted_prompt_cancels() {
        let interrupted =
            dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "read interrupted"));
        let err = prompt::<usize>(Err(interrupted)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContinuityError>(),
            Some(ContinuityError::UserCancelled)
        ));

        let broken = dialoguer::Error::IO(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let err = prompt::<usize>(Err(broken)).unwrap_err();
        assert!(err.downcast_ref::<ContinuityError>().is_none());

        assert_eq!(prompt(Ok::<_, dialoguer::Error>(3)).unwrap(), 3);
    }
}
