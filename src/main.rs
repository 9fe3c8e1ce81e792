use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use agency_desk::pagination::PAGE_SIZE_OPTIONS;

mod cmd;

#[derive(Parser)]
#[command(name = "agency-desk")]
#[command(version, about = "Back-office client for the agency REST backend")]
pub struct Cli {
    /// Backend base URL (overrides AGENCY_BASE_API and desk.toml)
    #[arg(long, global = true)]
    pub base_api: Option<String>,

    /// API token (overrides AGENCY_API_TOKEN and desk.toml)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Output format for command results: text, json
    #[arg(long, default_value = "text", global = true)]
    pub output: String,

    /// Answer yes to confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Directory to look for .agency/desk.toml in (defaults to the current directory)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View, create or validate desk.toml
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show the signed-in user
    Whoami,
    /// Edit your own profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Kanban boards
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Lists (board columns)
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Cards (tasks) on a board
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },
    /// Flat table of every task across all boards
    Tasks {
        /// Only tasks assigned to this user (id, username or email)
        #[arg(long)]
        user: Option<String>,
        /// Only tasks with this status, e.g. "completed" or "in-progress"
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive match on title, description and tags
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "1")]
        page: usize,
        /// Rows per page: 12, 24, 48 or 96 (defaults to ui.items_per_page)
        #[arg(long, value_parser = parse_page_size)]
        per_page: Option<usize>,
    },
    /// Move every task from one assignee to another
    Reassign {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Staff documents and their sign-off workflow
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },
    /// Job applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommands,
    },
    /// Open positions
    Jobs {
        #[command(subcommand)]
        command: Option<JobCommands>,
    },
    /// Appointments
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },
    /// Blog posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Portfolio projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Request a project proposal
    Proposal {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
        /// Service slug, e.g. web-development
        #[arg(long)]
        service: String,
        /// Budget with or without currency symbol, e.g. "R25,000"
        #[arg(long)]
        budget: String,
        #[arg(long)]
        timeline: Option<String>,
        #[arg(long)]
        details: String,
    },
    /// Submit or list testimonials
    Testimonial {
        #[command(subcommand)]
        command: TestimonialCommands,
    },
    /// Show a service page
    Service {
        slug: String,
        /// Currency for the starting price (defaults to ui.currency)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Forgotten password flow
    Password {
        #[command(subcommand)]
        command: PasswordCommands,
    },
    /// Price conversion and formatting helpers (offline)
    Price {
        #[command(subcommand)]
        command: PriceCommands,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default .agency/desk.toml file
    Init,
}

#[derive(Subcommand, Clone)]
pub enum ProfileCommands {
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum BoardCommands {
    List,
    /// Show a board's columns and cards
    Show {
        id: i64,
        /// Show the columns in this order (list ids, comma-separated); not saved
        #[arg(long, value_delimiter = ',')]
        order: Vec<i64>,
    },
    Create {
        name: String,
    },
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ListCommands {
    Create {
        #[arg(long)]
        board: i64,
        name: String,
    },
    Delete {
        id: i64,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum CardCommands {
    Show {
        id: i64,
    },
    Add {
        #[arg(long)]
        list: i64,
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high or urgent
        #[arg(long)]
        priority: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// Move a card to another list
    Move {
        id: i64,
        #[arg(long)]
        to: i64,
    },
    Delete {
        id: i64,
        #[arg(long)]
        force: bool,
    },
    /// Replace a card's assignees (ids, usernames or emails)
    Assign {
        id: i64,
        #[arg(required = true)]
        users: Vec<String>,
    },
    Status {
        id: i64,
        status: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum DocsCommands {
    List {
        /// pending_staff, pending_manager, completed or rejected
        #[arg(long)]
        status: Option<String>,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        /// Staff member who signs first (user id)
        #[arg(long)]
        staff: i64,
        /// Line manager who countersigns (user id)
        #[arg(long)]
        manager: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Approve and sign a document with a PNG signature
    Sign {
        id: i64,
        #[arg(long)]
        signature: PathBuf,
        #[arg(long, default_value = "")]
        comments: String,
        /// Sign as staff or manager (defaults to your role on the document)
        #[arg(long = "as")]
        role: Option<String>,
    },
    /// Reject a pending document
    Reject {
        id: i64,
        #[arg(long)]
        reason: String,
        #[arg(long, default_value = "")]
        comments: String,
        #[arg(long = "as")]
        role: Option<String>,
    },
    /// Save the server-generated PDF
    Download {
        id: i64,
        /// Destination file (defaults to document-<id>.pdf)
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ApplicationCommands {
    List {
        /// pending, approved or rejected
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "1")]
        page: usize,
    },
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
    },
}

#[derive(Subcommand, Clone)]
pub enum AppointmentCommands {
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "1")]
        page: usize,
    },
    Book {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Status {
        id: i64,
        /// pending, confirmed, cancelled or completed
        status: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum JobCommands {
    /// List open positions
    List,
    /// Apply for a position
    Apply {
        /// Job id
        job: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        cover_letter: Option<String>,
        /// Link to a hosted CV
        #[arg(long)]
        resume_url: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum PostCommands {
    List {
        #[arg(long, default_value = "1")]
        page: usize,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        /// Post body; read from --file when omitted
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        id: i64,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProjectCommands {
    List {
        #[arg(long, default_value = "1")]
        page: usize,
        /// Give up after this many seconds
        #[arg(long, default_value = "15")]
        timeout: u64,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tech: Vec<String>,
        #[arg(long)]
        live_url: Option<String>,
    },
    Delete {
        id: i64,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum TestimonialCommands {
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// 1 to 5
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        message: String,
    },
    List,
}

#[derive(Subcommand, Clone)]
pub enum PasswordCommands {
    /// Email a reset link
    Forgot {
        #[arg(long)]
        email: String,
    },
    /// Set a new password from a reset link
    Reset {
        #[arg(long)]
        uid: String,
        /// Token from the reset link
        #[arg(long = "reset-token")]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum PriceCommands {
    /// Convert a ZAR amount into another currency
    Convert {
        amount: f64,
        #[arg(long, default_value = "USD")]
        to: String,
    },
    /// Format an amount with currency symbol and separators
    Format {
        amount: f64,
        #[arg(long, default_value = "ZAR")]
        currency: String,
    },
    /// Extract the amount from a price string like "R1,234.50"
    Parse {
        text: String,
    },
}

fn parse_page_size(s: &str) -> std::result::Result<usize, String> {
    let size: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a page size", s))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {:?}", PAGE_SIZE_OPTIONS))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let work_dir = match cli.work_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let overrides = agency_desk::config::CliOverrides {
        base_api: cli.base_api.clone(),
        token: cli.token.clone(),
        verbose: cli.verbose,
        json_logs: cli.json_logs,
    };

    // Commands that work without a usable backend configuration.
    match &cli.command {
        Commands::Config { command } => {
            return cmd::cmd_config(&work_dir, &overrides, command.clone());
        }
        Commands::Price { command } => return cmd::cmd_price(command.clone(), &cli.output),
        _ => {}
    }

    let config = agency_desk::config::DeskConfig::resolve(&work_dir, &overrides)?;
    agency_desk::logging::init(&config);
    let mut desk = cmd::Desk::new(config, &cli.output, cli.yes)?;

    match &cli.command {
        Commands::Config { .. } | Commands::Price { .. } => {}
        Commands::Whoami => cmd::cmd_whoami(&mut desk).await?,
        Commands::Profile { command } => cmd::cmd_profile(&mut desk, command.clone()).await?,
        Commands::Board { command } => cmd::cmd_board(&mut desk, command.clone()).await?,
        Commands::List { command } => cmd::cmd_list(&mut desk, command.clone()).await?,
        Commands::Card { command } => cmd::cmd_card(&mut desk, command.clone()).await?,
        Commands::Tasks {
            user,
            status,
            search,
            page,
            per_page,
        } => {
            let query = cmd::tasks::TaskQuery {
                user: user.clone(),
                status: status.clone(),
                search: search.clone(),
                page: *page,
                per_page: *per_page,
            };
            cmd::cmd_tasks(&mut desk, query).await?
        }
        Commands::Reassign { from, to } => cmd::cmd_reassign(&mut desk, from, to).await?,
        Commands::Docs { command } => cmd::cmd_docs(&mut desk, command.clone()).await?,
        Commands::Applications { command } => {
            cmd::cmd_applications(&mut desk, command.clone()).await?
        }
        Commands::Jobs { command } => cmd::cmd_jobs(&mut desk, command.clone()).await?,
        Commands::Appointments { command } => {
            cmd::cmd_appointments(&mut desk, command.clone()).await?
        }
        Commands::Posts { command } => cmd::cmd_posts(&mut desk, command.clone()).await?,
        Commands::Projects { command } => cmd::cmd_projects(&mut desk, command.clone()).await?,
        Commands::Contact {
            name,
            email,
            phone,
            subject,
            message,
        } => {
            let form = agency_desk::leads::ContactMessage {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                subject: subject.clone(),
                message: message.clone(),
            };
            cmd::cmd_contact(&mut desk, form).await?
        }
        Commands::Proposal {
            name,
            email,
            company,
            service,
            budget,
            timeline,
            details,
        } => {
            let form = agency_desk::leads::ProposalRequest {
                name: name.clone(),
                email: email.clone(),
                company: company.clone(),
                service: service.clone(),
                budget: budget.clone(),
                timeline: timeline.clone(),
                details: details.clone(),
            };
            cmd::cmd_proposal(&mut desk, form).await?
        }
        Commands::Testimonial { command } => {
            cmd::cmd_testimonial(&mut desk, command.clone()).await?
        }
        Commands::Service { slug, currency } => {
            cmd::cmd_service(&mut desk, slug, currency.as_deref()).await?
        }
        Commands::Password { command } => cmd::cmd_password(&mut desk, command.clone()).await?,
    }

    Ok(())
}
