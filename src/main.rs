use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::error;

use todue::commands::*;
use todue::config::Config;
use todue::logging::init_logging;
use todue::tui::run_tui;
use todue::{FileStore, TaskList, TodoError};

#[derive(Parser)]
#[command(name = "todue")]
#[command(about = "Simple to-do list with due dates", long_about = None)]
struct Cli {
    /// Directory holding the task data (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Due date in YYYY-MM-DD or "YYYY-MM-DD HH:MM"
        #[arg(short, long)]
        due: Option<String>,
        /// Description
        #[arg(short, long)]
        content: Option<String>,
    },
    /// List all tasks in creation order
    List,
    /// List tasks due today or later
    Due,
    /// Edit a task
    Edit {
        /// Task id or unique id prefix
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        content: Option<String>,
        /// New completion percentage
        #[arg(short, long)]
        percent: Option<String>,
    },
    /// Remove a task
    Remove {
        /// Task id or unique id prefix
        id: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn run(cli: Cli) -> Result<(), TodoError> {
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "todue", &mut io::stdout());
        return Ok(());
    }

    let config = Config::resolve(cli.data_dir, cli.log_level)?;
    if let Err(e) = init_logging(&config) {
        eprintln!("Logging disabled: {}", e);
    }

    let store = FileStore::new(&config.data_dir);
    match cli.command {
        Some(Commands::Ui) | None => {
            // Load failures are shown inside the TUI.
            if let Err(e) = run_tui(TaskList::new(store)) {
                error!("tui failed: {}", e);
                eprintln!("Error running TUI: {}", e);
            }
            Ok(())
        }
        Some(command) => {
            let mut list = TaskList::open(store)?;
            match command {
                Commands::Add { title, due, content } => cmd_add(&mut list, title, content, due, false).map(|_| ()),
                Commands::List => { cmd_list(&list); Ok(()) }
                Commands::Due => { cmd_due(&list); Ok(()) }
                Commands::Edit { id, title, content, percent } => cmd_edit(&mut list, &id, title, content, percent, false),
                Commands::Remove { id } => cmd_remove(&mut list, &id, false),
                Commands::Ui | Commands::Completions { .. } => Ok(()),
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
