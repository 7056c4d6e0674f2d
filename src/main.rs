//! # Neighborly
//!
//! A local-first community task board for the terminal. Neighbors post small
//! help requests, mark them helped, thank each other and list their skills.
//! Everything is stored on this device; nothing is sent anywhere.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! neighborly
//! # or explicitly
//! neighborly ui
//! ```
//!
//! **Key Bindings**
//! *   `q`: Quit
//! *   `a`: Post a new task
//! *   `r`: Repost selected task
//! *   `h` / `Enter`: I helped (asks for your nickname, then whether to remove the task)
//! *   `t`: Write an anonymous thank-you
//! *   `d`: Delete selected task
//! *   `s`: Add a skill
//! *   `/`: Search
//! *   `f`: Cycle neighborhood filter
//! *   `Esc`: Clear search and filter
//! *   `x`: Sweep expired tasks now
//! *   `v`: Switch between Tasks, Top Helpers, Skills and Thank-yous
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! neighborly post "Walk my dog" --category pet-care --minutes 30 --payment Coffee --urgent
//! neighborly list --neighborhood "My Street" --search dog
//! neighborly helped t_1a2b3c4d5 --nickname Ana --remove
//! neighborly leaderboard
//! neighborly skill add Ana "Bike repair"
//! neighborly thank "Thanks for the ladder!"
//! ```
//!
//! ## Rules
//!
//! *   Tasks disappear 24 hours after they were posted. Repost to keep one up.
//! *   Urgent tasks are listed first; the URGENT badge shows for the first hour.
//!
//! ## Data Storage
//!
//! Collections are saved as JSON in your local data directory:
//! *   Linux: `~/.local/share/neighborly/`
//! *   macOS: `~/Library/Application Support/neighborly/`
//! *   Windows: `%APPDATA%\neighborly\`
//!
//! Override it with the `NEIGHBORLY_HOME` environment variable. Settings live
//! in `config.toml` in the same directory.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use neighborly::board::Board;
use neighborly::commands::*;
use neighborly::config::Config;
use neighborly::logging;
use neighborly::models::{Category, NewTask};
use neighborly::storage::FileStore;
use neighborly::tui::run_tui;

#[derive(Parser)]
#[command(name = "neighborly")]
#[command(about = "Local-first community task board", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a new help request
    Post {
        /// Short title (quoted if it has spaces)
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, value_enum, default_value_t = Category::Other)]
        category: Category,
        /// Minutes of help needed
        #[arg(short, long, default_value_t = 0)]
        minutes: u32,
        /// What you offer in return (free text)
        #[arg(short, long, default_value = "Free")]
        payment: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(short, long, default_value = "")]
        location: String,
        /// Public place to meet
        #[arg(short, long, default_value = "")]
        safe_point: String,
        #[arg(short, long, default_value = "")]
        neighborhood: String,
        /// Flag the task as urgent
        #[arg(short, long)]
        urgent: bool,
    },
    /// List open tasks, urgent first
    List {
        /// Only show tasks in this neighborhood
        #[arg(short, long)]
        neighborhood: Option<String>,
        /// Case-insensitive text to search for
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Post a fresh copy of a task
    Repost {
        id: String,
    },
    /// Record that you helped with a task
    Helped {
        id: String,
        /// Your helper nickname
        #[arg(short, long)]
        nickname: Option<String>,
        /// Also take the task off the board
        #[arg(short, long)]
        remove: bool,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Show the top helpers
    Leaderboard {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Manage skills
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },
    /// Post an anonymous thank-you (max 140 characters)
    Thank {
        text: String,
    },
    /// List thank-yous
    Thanks,
    /// Remove expired tasks now
    Sweep,
    /// Delete everything on the board
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum SkillCommands {
    /// List a skill you can offer
    Add {
        nickname: String,
        skill: String,
    },
    /// List skills
    List,
}

fn main() {
    let cli = Cli::parse();
    let (data_dir, config) = Config::load_default();

    let interactive = matches!(cli.command, None | Some(Commands::Ui));
    if interactive {
        logging::init_file(&data_dir);
    } else {
        logging::init_stderr();
    }

    let mut board = Board::open(FileStore::new(&data_dir), config);

    match cli.command {
        Some(Commands::Post { title, description, category, minutes, payment, contact, location, safe_point, neighborhood, urgent }) => {
            let new = NewTask {
                title,
                description,
                category,
                time_needed_minutes: minutes,
                payment,
                contact,
                location,
                safe_point,
                neighborhood,
                urgent,
            };
            cmd_post(&mut board, new, false);
        }
        Some(Commands::List { neighborhood, search }) => {
            board.sweep_expired();
            cmd_list(&board, neighborhood, search);
        }
        Some(Commands::Repost { id }) => cmd_repost(&mut board, &id, false),
        Some(Commands::Helped { id, nickname, remove }) => cmd_helped(&mut board, &id, nickname, remove, false),
        Some(Commands::Delete { id }) => cmd_delete(&mut board, &id, false),
        Some(Commands::Leaderboard { limit }) => cmd_leaderboard(&board, limit),
        Some(Commands::Skill { command }) => match command {
            SkillCommands::Add { nickname, skill } => cmd_skill_add(&mut board, &nickname, &skill, false),
            SkillCommands::List => cmd_skill_list(&board),
        },
        Some(Commands::Thank { text }) => cmd_thank(&mut board, &text, false),
        Some(Commands::Thanks) => cmd_thanks_list(&board),
        Some(Commands::Sweep) => cmd_sweep(&mut board, false),
        Some(Commands::Reset { force }) => cmd_reset(&mut board, force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "neighborly", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(board) {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
