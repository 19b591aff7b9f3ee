use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use weatherlist_core::{
    Config, FileStore, KeyValueStore, ListError, ProviderId, WeatherEntry, WeatherList,
    WeatherLookup,
    provider::default_provider_from_config,
};

use crate::{interactive, toast::Toast};

pub type List = WeatherList<Box<dyn WeatherLookup>, FileStore>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlist", version, about = "Keep a list of cities and their current temperature")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    #[command(flatten)]
    Entries(EntryCommand),
}

/// Subcommands that open the saved list.
#[derive(Debug, Subcommand)]
pub enum EntryCommand {
    /// Look up a city and add it to the list.
    Add { city: String },

    /// Same as `add`.
    Search { city: String },

    /// Print the saved list.
    List,

    /// Re-fetch an entry under a new city name.
    Edit {
        id: u64,

        /// Replacement city; prompted for when absent.
        city: Option<String>,
    },

    /// Remove an entry.
    Delete { id: u64 },

    /// Menu-driven session.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Entries(EntryCommand::Interactive)) {
            Command::Configure { provider } => configure(&provider),
            Command::Entries(command) => run_entry_command(command).await,
        }
    }
}

async fn run_entry_command(command: EntryCommand) -> anyhow::Result<()> {
    let mut list = open_list()?;

    match command {
        EntryCommand::Add { city } => {
            if let Some(toast) = add_city(&mut list, &city).await {
                toast.show();
            }
        }
        EntryCommand::Search { city } => {
            if let Some(toast) = search_city(&mut list, &city).await {
                toast.show();
            }
        }
        EntryCommand::List => {}
        EntryCommand::Edit { id, city } => {
            let query = match (city, list.get(id)) {
                (Some(city), _) => city,
                (None, Some(entry)) => {
                    let current = entry.city.clone();
                    match prompt_city("Replacement city:", Some(&current))? {
                        Some(city) => city,
                        None => return Ok(()),
                    }
                }
                (None, None) => String::new(),
            };

            edit_city(&mut list, id, &query).await.show();
        }
        EntryCommand::Delete { id } => delete_city(&mut list, id).show(),
        EntryCommand::Interactive => return interactive::run(&mut list).await,
    }

    print!("{}", render(&list));
    Ok(())
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key);

    if config.default_provider_id().ok() != Some(id) {
        let make_default = Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    Toast::success(format!("Saved credentials for {id}")).show();
    Ok(())
}

fn open_list() -> anyhow::Result<List> {
    let config = Config::load()?;
    let lookup = default_provider_from_config(&config)?;
    let path = config.storage_file_path()?;

    tracing::debug!(path = %path.display(), "opening weather list");
    Ok(WeatherList::new(lookup, FileStore::new(path)))
}

/// Ask for a city name. `None` when the user cancels the prompt.
pub fn prompt_city(message: &str, initial: Option<&str>) -> anyhow::Result<Option<String>> {
    let mut prompt = Text::new(message);
    if let Some(initial) = initial {
        prompt = prompt.with_initial_value(initial);
    }

    match prompt.prompt() {
        Ok(city) => Ok(Some(city)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read city name"),
    }
}

/// Add `query` to the list. `None` when there is nothing to report (blank input).
pub async fn add_city<L: WeatherLookup, S: KeyValueStore>(
    list: &mut WeatherList<L, S>,
    query: &str,
) -> Option<Toast> {
    added_toast(list.add(query).await)
}

pub async fn search_city<L: WeatherLookup, S: KeyValueStore>(
    list: &mut WeatherList<L, S>,
    query: &str,
) -> Option<Toast> {
    added_toast(list.search(query).await)
}

fn added_toast(result: Result<Option<&WeatherEntry>, ListError>) -> Option<Toast> {
    match result {
        Ok(Some(entry)) => Some(Toast::success(format!("Added {entry}"))),
        Ok(None) => None,
        Err(err) => Some(Toast::from(&err)),
    }
}

pub async fn edit_city<L: WeatherLookup, S: KeyValueStore>(
    list: &mut WeatherList<L, S>,
    id: u64,
    query: &str,
) -> Toast {
    let exists = list.get(id).is_some();

    match list.edit(id, query).await {
        Ok(Some(entry)) => Toast::success(format!("Updated {entry}")),
        Ok(None) if exists => Toast::info("Entry left unchanged."),
        Ok(None) => Toast::info(format!("No city with id {id}.")),
        Err(err) => Toast::from(&err),
    }
}

pub fn delete_city<L: WeatherLookup, S: KeyValueStore>(
    list: &mut WeatherList<L, S>,
    id: u64,
) -> Toast {
    match list.delete(id) {
        Some(entry) => Toast::success(format!("Deleted {}", entry.city)),
        None => Toast::info(format!("No city with id {id}.")),
    }
}

pub fn render<L: WeatherLookup, S: KeyValueStore>(list: &WeatherList<L, S>) -> String {
    if list.is_empty() {
        return "No cities yet.\n".to_string();
    }

    list.entries().iter().map(|entry| format!("{}. {entry}\n", entry.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use weatherlist_core::{CityWeather, LookupError, MemoryStore};

    #[derive(Debug)]
    struct OnlyParis;

    #[async_trait]
    impl WeatherLookup for OnlyParis {
        async fn lookup(&self, city: &str) -> Result<CityWeather, LookupError> {
            if city.eq_ignore_ascii_case("paris") {
                Ok(CityWeather { name: "Paris".into(), temperature_c: 18.5 })
            } else {
                Err(LookupError::Status { provider: "fake", status: 404, body: String::new() })
            }
        }
    }

    fn list() -> WeatherList<OnlyParis, MemoryStore> {
        WeatherList::new(OnlyParis, MemoryStore::new())
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["weatherlist"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn edit_city_argument_is_optional() {
        let cli = Cli::try_parse_from(["weatherlist", "edit", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Entries(EntryCommand::Edit { id: 3, city: None }))
        ));
    }

    #[test]
    fn configure_is_separate_from_list_commands() {
        let cli = Cli::try_parse_from(["weatherlist", "configure", "openweather"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure { ref provider }) if provider == "openweather"));

        let cli = Cli::try_parse_from(["weatherlist", "delete", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Entries(EntryCommand::Delete { id: 2 }))));
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["weatherlist", "list", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[tokio::test]
    async fn add_reports_success_and_renders() {
        let mut list = list();

        let toast = add_city(&mut list, "paris").await.unwrap();

        assert_eq!(toast, Toast::success("Added Paris - 18.5°C"));
        assert_eq!(render(&list), "1. Paris - 18.5°C\n");
    }

    #[tokio::test]
    async fn search_adds_like_add() {
        let mut list = list();

        let toast = search_city(&mut list, "Paris").await.unwrap();

        assert_eq!(toast.kind, crate::toast::Kind::Success);
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn add_blank_is_silent() {
        let mut list = list();
        assert!(add_city(&mut list, "  ").await.is_none());
        assert_eq!(render(&list), "No cities yet.\n");
    }

    #[tokio::test]
    async fn add_duplicate_shows_error() {
        let mut list = list();
        add_city(&mut list, "paris").await;

        let toast = add_city(&mut list, "PARIS").await.unwrap();

        assert_eq!(toast, Toast::error("Paris is already in the list."));
    }

    #[tokio::test]
    async fn edit_failure_shows_error() {
        let mut list = list();
        add_city(&mut list, "paris").await;

        let toast = edit_city(&mut list, 1, "london").await;

        assert_eq!(toast, Toast::error("City 'london' not found."));
        assert_eq!(list.entries()[0].city, "Paris");
    }

    #[tokio::test]
    async fn edit_unknown_id_is_info() {
        let mut list = list();
        let toast = edit_city(&mut list, 9, "paris").await;
        assert_eq!(toast, Toast::info("No city with id 9."));
    }

    #[tokio::test]
    async fn delete_reports_outcome() {
        let mut list = list();
        add_city(&mut list, "paris").await;

        assert_eq!(delete_city(&mut list, 1), Toast::success("Deleted Paris"));
        assert_eq!(delete_city(&mut list, 1), Toast::info("No city with id 1."));
    }
}
