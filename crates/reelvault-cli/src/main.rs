use clap::{ArgAction, Parser, Subcommand};
use commands::{account, config, history, watchlist};
use watchlist_sync_models::ItemType;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelvault")]
#[command(about = "Reelvault - Your watchlist, on every device")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to your account
    #[command(long_about = "Authenticate against the catalog backend and store the session locally. The remote watchlist is pulled into the local snapshot once the session is established.")]
    Login {
        /// Account email (if not provided, will prompt)
        #[arg(long)]
        email: Option<String>,
    },

    /// Create an account
    #[command(long_about = "Register a new account. The backend issues a session immediately, so registering also signs you in.")]
    Register {
        /// Account email (if not provided, will prompt)
        #[arg(long)]
        email: Option<String>,

        /// Display name (if not provided, will prompt)
        #[arg(long)]
        name: Option<String>,
    },

    /// Sign out and clear the device-local list
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show the watchlist
    #[command(long_about = "Display the local watchlist snapshot. When a session is stored, the remote list is pulled first so the snapshot reflects the account state.")]
    List,

    /// Add an item to the watchlist
    #[command(long_about = "Add a catalog item to the watchlist. The entry is applied to the local snapshot immediately; when signed in it is pushed to the account and rolled back if the server rejects it.")]
    Add {
        /// Catalog item id
        #[arg(long)]
        id: u64,

        /// Item type: movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        item_type: ItemType,

        /// Item title
        #[arg(long)]
        title: String,

        #[arg(long, value_name = "PATH")]
        poster_path: Option<String>,

        #[arg(long, value_name = "PATH")]
        backdrop_path: Option<String>,

        #[arg(long)]
        overview: Option<String>,

        /// Release date, e.g. 2010-07-16
        #[arg(long, value_name = "DATE")]
        release_date: Option<String>,

        /// Average vote on a 0-10 scale
        #[arg(long)]
        vote_average: Option<f64>,
    },

    /// Remove an item from the watchlist
    #[command(long_about = "Remove a catalog item from the watchlist by id. The removal is applied locally immediately; when signed in it is pushed to the account and the entry is restored if the server call fails.")]
    Remove {
        /// Catalog item id
        #[arg(long)]
        id: u64,
    },

    /// Pull the remote watchlist into the local snapshot
    Sync,

    /// Inspect viewing history
    History {
        #[command(subcommand)]
        cmd: HistoryCommands,
    },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Show recent viewing history
    Show {
        /// Maximum number of records to fetch
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },

    /// Record a view (updates the existing record on repeat views)
    Add {
        /// Catalog item id
        #[arg(long)]
        id: u64,

        /// Item type: movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        item_type: ItemType,

        /// Item title
        #[arg(long)]
        title: String,

        #[arg(long, value_name = "PATH")]
        poster_path: Option<String>,

        /// Percent watched, 0-100
        #[arg(long)]
        progress: Option<f64>,
    },

    /// Delete one record from the history
    Remove {
        /// Catalog item id
        #[arg(long)]
        id: u64,

        /// Item type: movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        item_type: ItemType,
    },

    /// Clear the whole viewing history
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the stored token)
    Show {
        /// Show full configuration including masked values
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Set the backend server URL
    Server {
        /// Base URL of the backend API, e.g. http://localhost:5001/api
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Login { email } => account::run_login(email, &output).await,
        Commands::Register { email, name } => account::run_register(email, name, &output).await,
        Commands::Logout => account::run_logout(&output).await,
        Commands::Whoami => account::run_whoami(&output).await,
        Commands::List => watchlist::run_list(&output).await,
        Commands::Add {
            id,
            item_type,
            title,
            poster_path,
            backdrop_path,
            overview,
            release_date,
            vote_average,
        } => {
            let entry = watchlist::EntryArgs {
                id,
                item_type,
                title,
                poster_path,
                backdrop_path,
                overview,
                release_date,
                vote_average,
            };
            watchlist::run_add(entry, &output).await
        }
        Commands::Remove { id } => watchlist::run_remove(id, &output).await,
        Commands::Sync => watchlist::run_sync(&output).await,
        Commands::History { cmd } => match cmd {
            HistoryCommands::Show { limit } => history::run_show(limit, &output).await,
            HistoryCommands::Add {
                id,
                item_type,
                title,
                poster_path,
                progress,
            } => history::run_add(id, item_type, title, poster_path, progress, &output).await,
            HistoryCommands::Remove { id, item_type } => {
                history::run_remove(id, item_type, &output).await
            }
            HistoryCommands::Clear => history::run_clear(&output).await,
        },
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output).await
        }
    }
}
