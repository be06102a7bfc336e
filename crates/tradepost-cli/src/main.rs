use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tradepost_core::listing::ListingId;
use tradepost_core::messaging::ConversationId;
use tradepost_core::session::UserId;
use tradepost_infrastructure::{ConfigService, TradepostPaths};

mod bootstrap;
mod commands;
mod logging;

use bootstrap::App;

#[derive(Parser)]
#[command(name = "tradepost")]
#[command(about = "Tradepost CLI - browse listings and message other students", long_about = None)]
struct Cli {
    /// Configuration directory (defaults to ~/.config/tradepost)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami {
        /// Re-fetch the identity from the server
        #[arg(long)]
        refresh: bool,
    },
    /// Search listings
    Search(SearchArgs),
    /// List categories
    Categories {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Show one listing
    Listing { id: ListingId },
    /// List your conversations
    Inbox,
    /// Open (or create) a conversation with another user
    Open { user_id: UserId },
    /// Show the messages of a conversation
    Messages { conversation_id: ConversationId },
    /// Send a message to a conversation
    Send {
        conversation_id: ConversationId,
        content: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Only skill-sharing offers
    #[arg(long, conflicts_with = "items")]
    pub skills: bool,
    /// Only physical items
    #[arg(long)]
    pub items: bool,
}

impl ContextArgs {
    pub fn skill_context(&self) -> Option<bool> {
        match (self.skills, self.items) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free-text query
    pub query: Option<String>,
    #[arg(long)]
    pub category: Option<i64>,
    /// Item condition, e.g. "like_new" (ignored for skills)
    #[arg(long)]
    pub condition: Option<String>,
    #[arg(long)]
    pub min_price: Option<String>,
    #[arg(long)]
    pub max_price: Option<String>,
    #[command(flatten)]
    pub context: ContextArgs,
    /// Hydrate filters from a query string such as "q=desk&category_id=2"
    #[arg(long, conflicts_with_all = ["query", "category", "condition", "min_price", "max_price"])]
    pub from_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = ConfigService::new(TradepostPaths::new(cli.config_dir.as_deref())?);
    let config = config_service.get_config()?;
    let _log_guard = logging::init(&config, config_service.paths())?;
    let app = App::bootstrap(config, config_service.paths())?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&app, &email, &password).await?
        }
        Commands::Logout => commands::auth::logout(&app)?,
        Commands::Whoami { refresh } => commands::auth::whoami(&app, refresh).await?,
        Commands::Search(args) => commands::search::run(&app, args).await?,
        Commands::Categories { context } => {
            commands::listings::categories(&app, context.skill_context()).await?
        }
        Commands::Listing { id } => commands::listings::show(&app, id).await?,
        Commands::Inbox => commands::messaging::inbox(&app).await?,
        Commands::Open { user_id } => commands::messaging::open(&app, user_id).await?,
        Commands::Messages { conversation_id } => {
            commands::messaging::messages(&app, conversation_id).await?
        }
        Commands::Send {
            conversation_id,
            content,
        } => commands::messaging::send(&app, conversation_id, &content).await?,
    }

    Ok(())
}
