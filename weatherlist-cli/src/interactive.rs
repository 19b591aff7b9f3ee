use std::fmt;

use anyhow::Context;
use inquire::{InquireError, Select};
use weatherlist_core::WeatherEntry;

use crate::cli::{List, add_city, delete_city, edit_city, prompt_city, render, search_city};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Search,
    Edit,
    Delete,
    Quit,
}

impl Action {
    /// Edit and Delete need something to act on.
    fn available(list_is_empty: bool) -> Vec<Action> {
        if list_is_empty {
            vec![Action::Add, Action::Search, Action::Quit]
        } else {
            vec![Action::Add, Action::Search, Action::Edit, Action::Delete, Action::Quit]
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Add => "Add",
            Action::Search => "Search",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::Quit => "Quit",
        })
    }
}

/// Menu loop: render the list, ask for an action, apply it, repeat.
pub async fn run(list: &mut List) -> anyhow::Result<()> {
    loop {
        print!("\n{}", render(&*list));

        let Some(action) = choose(Select::new("What next?", Action::available(list.is_empty())))?
        else {
            return Ok(());
        };

        match action {
            Action::Add => {
                let Some(query) = prompt_city("City:", None)? else { continue };
                if let Some(toast) = add_city(list, &query).await {
                    toast.show();
                }
            }
            Action::Search => {
                let Some(query) = prompt_city("Search city:", None)? else { continue };
                if let Some(toast) = search_city(list, &query).await {
                    toast.show();
                }
            }
            Action::Edit => {
                let Some(entry) = pick_entry(list, "Edit which city?")? else { continue };
                let Some(query) = prompt_city("Replacement city:", Some(&entry.city))? else {
                    continue;
                };
                edit_city(list, entry.id, &query).await.show();
            }
            Action::Delete => {
                let Some(entry) = pick_entry(list, "Delete which city?")? else { continue };
                delete_city(list, entry.id).show();
            }
            Action::Quit => return Ok(()),
        }
    }
}

fn pick_entry(list: &List, message: &str) -> anyhow::Result<Option<WeatherEntry>> {
    choose(Select::new(message, list.entries().to_vec()))
}

/// `None` when the user escapes out of the menu.
fn choose<T: fmt::Display>(select: Select<'_, T>) -> anyhow::Result<Option<T>> {
    match select.prompt() {
        Ok(choice) => Ok(Some(choice)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read selection"),
    }
}
