//! griv - Citizen grievance tracker
//!
//! File complaints, track them by code, triage and resolve them, and read
//! the ward/category dashboards. No database, no daemon - just JSONL files
//! in .griv/

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "griv")]
#[command(about = "Citizen grievance tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new griv repository
    Init {
        /// Tracking code series base (first code is base + 1)
        #[arg(long)]
        series_base: Option<u64>,
    },

    /// File a new grievance
    Submit {
        /// Complaint description
        description: String,

        /// Category (water-supply, road-maintenance, garbage, electricity, drainage, other)
        #[arg(short, long)]
        category: String,

        /// Municipal ward
        #[arg(short, long)]
        ward: String,

        /// Submitting citizen id
        #[arg(long)]
        citizen: String,

        /// Submitting citizen name
        #[arg(long)]
        name: String,

        /// Priority (low, medium, high, critical)
        #[arg(short, long)]
        priority: Option<String>,

        /// Pinned location latitude
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Pinned location longitude
        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        /// Attached image reference
        #[arg(long)]
        image: Option<String>,
    },

    /// List grievances (admin triage view)
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by ward
        #[arg(short, long)]
        ward: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by submitting citizen id
        #[arg(long)]
        citizen: Option<String>,

        /// Free-text search over tracking code, citizen name and description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show grievance details
    Show {
        /// Record id (grv-...) or tracking code (TMC...)
        id: String,
    },

    /// Track a grievance by its tracking code (citizen view)
    Track {
        /// Tracking code, case-insensitive
        tracking_id: String,
    },

    /// Change a grievance's status
    Status {
        /// Record id or tracking code
        id: String,

        /// New status (pending, in-progress, resolved, escalated)
        new_status: String,

        /// Timeline message (defaults to one derived from the status)
        #[arg(short, long)]
        message: Option<String>,

        /// Acting admin/officer name
        #[arg(short, long, default_value = "Admin")]
        actor: String,
    },

    /// Append an admin remark (does not touch the timeline)
    Remark {
        /// Record id or tracking code
        id: String,

        /// Remark text
        text: String,
    },

    /// Assign a grievance to a handler
    Assign {
        /// Record id or tracking code
        id: String,

        /// Handler name, or "-" to clear the assignment
        handler: String,
    },

    /// Show dashboard statistics
    Stats,

    /// List configured wards
    Wards,

    /// List complaint categories
    Categories,

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Edit configuration file
    Edit,
    /// Reset to default configuration
    Reset,
    /// Get a specific config value
    Get {
        /// Config key (e.g., "series_base", "display.colors")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { series_base } => commands::init(series_base),
        Commands::Submit {
            description,
            category,
            ward,
            citizen,
            name,
            priority,
            lat,
            lng,
            image,
        } => commands::submit(
            &description,
            &category,
            &ward,
            &citizen,
            &name,
            priority,
            lat.zip(lng),
            image,
            cli.json,
        ),
        Commands::List {
            status,
            ward,
            category,
            citizen,
            search,
        } => commands::list(status, ward, category, citizen, search, cli.json),
        Commands::Show { id } => commands::show(&id, cli.json),
        Commands::Track { tracking_id } => commands::track(&tracking_id, cli.json),
        Commands::Status {
            id,
            new_status,
            message,
            actor,
        } => commands::status(&id, &new_status, message, &actor, cli.json),
        Commands::Remark { id, text } => commands::remark(&id, &text, cli.json),
        Commands::Assign { id, handler } => commands::assign(&id, &handler, cli.json),
        Commands::Stats => commands::stats(cli.json),
        Commands::Wards => commands::wards(cli.json),
        Commands::Categories => commands::categories(cli.json),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) => commands::config_show(cli.json),
            Some(ConfigCommands::Edit) => commands::config_edit(),
            Some(ConfigCommands::Reset) => commands::config_reset(),
            Some(ConfigCommands::Get { key }) => commands::config_get(&key, cli.json),
            Some(ConfigCommands::Set { key, value }) => commands::config_set(&key, &value),
            None => commands::config_show(cli.json),
        },
    }
}
