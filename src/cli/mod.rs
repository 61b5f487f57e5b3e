//! CLI command definitions and handlers.
//!
//! The CLI stands in for the web layer: it resolves the acting user by
//! username, calls the services, and prints results. Every mutation command
//! takes `--user` explicitly; there is no ambient session.
//!
//! # Example Usage
//!
//! ```bash
//! # Register and create a list
//! cardbox register alice '$pbkdf2$...'
//! cardbox create-list --user alice "French basics" \
//!     --card "dog=chien" --card "cat=chat"
//!
//! # Folders and keywords
//! cardbox create-folder --user alice Languages
//! cardbox folder add --user alice --list 1 --folder 1
//! cardbox keyword add --user alice --list 1 verbs
//! cardbox keyword toggle --user alice --list 1 --keyword 1 --off
//!
//! # Edit a card in place
//! cardbox edit-card --user alice --list 1 --card 2 --term cat --definition feline
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};

use crate::models::{FolderId, ListId, NewCard, User};
use crate::services::{AccountService, CardService, FolderService, KeywordService, ListService};
use crate::storage::SqliteStudyBackend;
use crate::CardboxConfig;

/// Cardbox - flashcard lists, folders, and keywords over SQLite.
#[derive(Parser)]
#[command(name = "cardbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory override (defaults to the platform data dir).
    #[arg(long, global = true, env = "CARDBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Register a new user.
    Register {
        /// Unique username.
        username: String,

        /// Password hash produced by the auth layer.
        password_hash: String,
    },

    /// Create a list of flashcards.
    CreateList {
        /// Acting user (by username).
        #[arg(short, long)]
        user: String,

        /// List title.
        title: String,

        /// List description.
        #[arg(short, long, default_value = "")]
        description: String,

        /// Card as "term=definition"; repeat for each card. At least two
        /// non-empty cards are required.
        #[arg(long = "card")]
        cards: Vec<String>,
    },

    /// Create a folder.
    CreateFolder {
        /// Acting user (by username).
        #[arg(short, long)]
        user: String,

        /// Folder name.
        name: String,
    },

    /// Manage list-folder membership.
    Folder {
        #[command(subcommand)]
        action: FolderAction,
    },

    /// Manage list keywords.
    Keyword {
        #[command(subcommand)]
        action: KeywordAction,
    },

    /// Overwrite one card's term and definition.
    EditCard {
        #[command(flatten)]
        target: ListTarget,

        /// Card id within the list.
        #[arg(long = "card")]
        card_id: u32,

        /// New term (pass the current value to keep it).
        #[arg(short, long, default_value = "")]
        term: String,

        /// New definition (pass the current value to keep it).
        #[arg(short, long, default_value = "")]
        definition: String,
    },

    /// Show a list by path, with cards, folders, and keywords.
    Show {
        /// The list's path slug, e.g. "french-basics_1".
        path: String,
    },

    /// List a user's lists and folders.
    Overview {
        /// Acting user (by username).
        #[arg(short, long)]
        user: String,
    },
}

/// Folder membership subcommands.
#[derive(Subcommand)]
pub enum FolderAction {
    /// Add a list to a folder.
    Add {
        #[command(flatten)]
        target: ListTarget,

        /// Folder id.
        #[arg(long = "folder")]
        folder_id: i64,
    },

    /// Remove a list from a folder.
    Remove {
        #[command(flatten)]
        target: ListTarget,

        /// Folder id.
        #[arg(long = "folder")]
        folder_id: i64,
    },

    /// Show the lists inside a folder.
    Lists {
        /// Acting user (by username).
        #[arg(short, long)]
        user: String,

        /// Folder id.
        #[arg(long = "folder")]
        folder_id: i64,
    },
}

/// Keyword subcommands.
#[derive(Subcommand)]
pub enum KeywordAction {
    /// Attach a new keyword to a list.
    Add {
        #[command(flatten)]
        target: ListTarget,

        /// Keyword text.
        text: String,
    },

    /// Toggle a keyword's active flag.
    Toggle {
        #[command(flatten)]
        target: ListTarget,

        /// Keyword id within the list.
        #[arg(long = "keyword")]
        keyword_id: u32,

        /// Deactivate instead of activate.
        #[arg(long)]
        off: bool,
    },
}

/// Common `--user`/`--list` addressing for list mutations.
#[derive(Args)]
pub struct ListTarget {
    /// Acting user (by username).
    #[arg(short, long)]
    pub user: String,

    /// List id.
    #[arg(long = "list")]
    pub list_id: i64,
}

/// The service bundle every command runs against.
pub struct App {
    /// Account registration and lookup.
    pub accounts: AccountService,
    /// List creation and reads.
    pub lists: ListService,
    /// Folders and membership.
    pub folders: FolderService,
    /// Keyword tags.
    pub keywords: KeywordService,
    /// Card edits.
    pub cards: CardService,
}

impl App {
    /// Opens the database named by the config and wires up all services.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened.
    pub fn open(config: &CardboxConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("creating data directory {}", config.data_dir.display())
        })?;

        let backend = Arc::new(SqliteStudyBackend::new(config.database_path())?);
        Ok(Self {
            accounts: AccountService::new(backend.clone()),
            lists: ListService::new(backend.clone()),
            folders: FolderService::new(backend.clone()),
            keywords: KeywordService::new(backend.clone()),
            cards: CardService::new(backend),
        })
    }

    fn resolve_user(&self, username: &str) -> anyhow::Result<User> {
        match self.accounts.find_by_username(username)? {
            Some(user) => Ok(user),
            None => bail!("no such user: {username}"),
        }
    }
}

/// Renders an epoch-seconds timestamp as a calendar date.
fn format_date(epoch_secs: i64) -> String {
    chrono::DateTime::from_timestamp(epoch_secs, 0).map_or_else(
        || epoch_secs.to_string(),
        |dt| dt.format("%Y-%m-%d").to_string(),
    )
}

/// Parses a `term=definition` card argument.
fn parse_card(raw: &str) -> anyhow::Result<NewCard> {
    match raw.split_once('=') {
        Some((term, definition)) => Ok(NewCard::new(term, definition)),
        None => bail!("card '{raw}' is not in term=definition form"),
    }
}

/// Runs one parsed command to completion.
///
/// # Errors
///
/// Returns any service or storage error; the caller renders it.
#[allow(clippy::too_many_lines)]
pub fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Register {
            username,
            password_hash,
        } => {
            let user = app.accounts.register(&username, &password_hash)?;
            println!("registered user {} (id {})", user.username, user.id);
        },

        Commands::CreateList {
            user,
            title,
            description,
            cards,
        } => {
            let user = app.resolve_user(&user)?;
            let cards = cards
                .iter()
                .map(|raw| parse_card(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let list = app.lists.create(user.id, &title, &description, cards)?;
            println!(
                "created list '{}' (id {}, path {}, {} cards)",
                list.title,
                list.id,
                list.path,
                list.cards.len()
            );
        },

        Commands::CreateFolder { user, name } => {
            let user = app.resolve_user(&user)?;
            let folder = app.folders.create(user.id, &name)?;
            println!(
                "created folder '{}' (id {}, path {})",
                folder.name, folder.id, folder.path
            );
        },

        Commands::Folder { action } => run_folder(app, action)?,
        Commands::Keyword { action } => run_keyword(app, action)?,

        Commands::EditCard {
            target,
            card_id,
            term,
            definition,
        } => {
            let user = app.resolve_user(&target.user)?;
            app.cards.update(
                ListId::new(target.list_id),
                user.id,
                card_id,
                &term,
                &definition,
            )?;
            println!("card {card_id} updated");
        },

        Commands::Show { path } => {
            let Some(list) = app.lists.get_by_path(&path)? else {
                bail!("no list at path '{path}'");
            };
            println!(
                "{} - {} (created {})",
                list.title,
                list.description,
                format_date(list.creation_date)
            );
            for card in &list.cards {
                println!("  [{}] {} = {}", card.id, card.term, card.definition);
            }
            if !list.keywords.is_empty() {
                let tags: Vec<String> = list
                    .keywords
                    .iter()
                    .map(|k| {
                        let state = if k.active { "on" } else { "off" };
                        format!("{}({})", k.text, state)
                    })
                    .collect();
                println!("  keywords: {}", tags.join(", "));
            }
            if !list.folders.is_empty() {
                println!("  folders: {}", list.folders.join(", "));
            }
        },

        Commands::Overview { user } => {
            let user = app.resolve_user(&user)?;
            println!(
                "{} (registered {})",
                user.username,
                format_date(user.registration_date)
            );
            for folder in app.folders.for_user(user.id)? {
                println!("folder {} '{}' ({})", folder.id, folder.name, folder.path);
            }
            for list in app.lists.for_user(user.id)? {
                println!(
                    "list {} '{}' ({}, {} cards, created {})",
                    list.id,
                    list.title,
                    list.path,
                    list.cards.len(),
                    format_date(list.creation_date)
                );
            }
        },
    }

    Ok(())
}

fn run_folder(app: &App, action: FolderAction) -> anyhow::Result<()> {
    match action {
        FolderAction::Add { target, folder_id } => {
            let user = app.resolve_user(&target.user)?;
            let changed = app.folders.add_list(
                ListId::new(target.list_id),
                FolderId::new(folder_id),
                user.id,
            )?;
            if changed {
                println!("list {} added to folder {folder_id}", target.list_id);
            } else {
                println!("list {} already in folder {folder_id}", target.list_id);
            }
        },
        FolderAction::Remove { target, folder_id } => {
            let user = app.resolve_user(&target.user)?;
            let changed = app.folders.remove_list(
                ListId::new(target.list_id),
                FolderId::new(folder_id),
                user.id,
            )?;
            if changed {
                println!("list {} removed from folder {folder_id}", target.list_id);
            } else {
                println!("list {} was not in folder {folder_id}", target.list_id);
            }
        },
        FolderAction::Lists { user, folder_id } => {
            let user = app.resolve_user(&user)?;
            let folder = app.folders.get(FolderId::new(folder_id))?;
            println!("folder '{}' ({})", folder.name, folder.path);
            for list in app.folders.lists_in_folder(folder.id, user.id)? {
                println!("  list {} '{}' ({})", list.id, list.title, list.path);
            }
        },
    }
    Ok(())
}

fn run_keyword(app: &App, action: KeywordAction) -> anyhow::Result<()> {
    match action {
        KeywordAction::Add { target, text } => {
            let user = app.resolve_user(&target.user)?;
            let keyword = app
                .keywords
                .create(ListId::new(target.list_id), user.id, &text)?;
            println!("keyword {} '{}' added", keyword.id, keyword.text);
        },
        KeywordAction::Toggle {
            target,
            keyword_id,
            off,
        } => {
            let user = app.resolve_user(&target.user)?;
            app.keywords
                .set_active(ListId::new(target.list_id), user.id, keyword_id, !off)?;
            let state = if off { "inactive" } else { "active" };
            println!("keyword {keyword_id} is now {state}");
        },
    }
    Ok(())
}

/// Resolves the effective config from CLI flags.
#[must_use]
pub fn resolve_config(config: Option<&PathBuf>, data_dir: Option<PathBuf>) -> CardboxConfig {
    let mut resolved = config.map_or_else(CardboxConfig::load_default, |path| {
        CardboxConfig::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config file, using defaults");
            CardboxConfig::load_default()
        })
    });
    if let Some(dir) = data_dir {
        resolved = resolved.with_data_dir(dir);
    }
    resolved
}
