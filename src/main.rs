use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harvestkit::cli::commands;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(
    version,
    about = "Harvest design tokens and components from rendered web pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a harvest workspace in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing initialization")]
        force: bool,
    },

    /// Extract a harvest record from one or more pages
    Extract {
        #[arg(required = true, help = "URLs, or snapshot files with --snapshot")]
        targets: Vec<String>,
        #[arg(long, help = "Treat targets as captured snapshot JSON files")]
        snapshot: bool,
        #[arg(long, short, help = "Where to write the record")]
        output: Option<PathBuf>,
        #[arg(long, short, help = "Add the record to this project")]
        project: Option<String>,
        #[arg(long, help = "Pause between pages in milliseconds")]
        delay_ms: Option<u64>,
    },

    /// Merge several harvest records into one
    Merge {
        #[arg(required = true, num_args = 2.., help = "Harvest record files")]
        inputs: Vec<PathBuf>,
        #[arg(long, short, help = "Output file (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Map a harvest record onto design tokens
    Tokens {
        #[arg(help = "Harvest record file")]
        input: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "css",
            help = "Output format: css, json"
        )]
        format: String,
        #[arg(long, short, help = "Output file (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Generate React components from a harvest record
    Generate {
        #[arg(help = "Harvest record file")]
        input: PathBuf,
        #[arg(help = "Single component kind to print (button, input, card, ...)")]
        kind: Option<String>,
        #[arg(long, help = "Generate every component kind, not only detected ones")]
        all: bool,
        #[arg(long, short, default_value = "components", help = "Output directory")]
        output: PathBuf,
    },

    /// Render design-system documentation for a harvest record
    Docs {
        #[arg(help = "Harvest record file")]
        input: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "md",
            help = "Output format: md, html"
        )]
        format: String,
        #[arg(long, short, help = "Output file (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Show workspace status
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(short = 'd', long, help = "Show detailed information")]
        detailed: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Register a new project
    Create {
        #[arg(help = "Project name")]
        name: String,
    },
    /// Add harvest records to a project and regenerate its artifacts
    Add {
        #[arg(help = "Project slug")]
        slug: String,
        #[arg(required = true, help = "Harvest record files")]
        inputs: Vec<PathBuf>,
    },
    /// List projects
    List {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show a project and its harvests
    Show {
        #[arg(help = "Project slug")]
        slug: String,
    },
    /// Delete a project and its files
    Delete {
        #[arg(help = "Project slug")]
        slug: String,
        #[arg(long, short, help = "Confirm deletion")]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mharvest encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(force)?,
        Commands::Extract {
            targets,
            snapshot,
            output,
            project,
            delay_ms,
        } => commands::extract::run(commands::extract::ExtractOptions {
            targets,
            snapshot,
            output,
            project,
            delay_ms,
        })?,
        Commands::Merge { inputs, output } => commands::merge::run(&inputs, output.as_deref())?,
        Commands::Tokens {
            input,
            format,
            output,
        } => commands::tokens::run(&input, &format, output.as_deref())?,
        Commands::Generate {
            input,
            kind,
            all,
            output,
        } => commands::generate::run(commands::generate::GenerateOptions {
            input: &input,
            kind: kind.as_deref(),
            all,
            out_dir: &output,
        })?,
        Commands::Docs {
            input,
            format,
            output,
        } => commands::docs::run(&input, &format, output.as_deref())?,
        Commands::Project { action } => match action {
            ProjectAction::Create { name } => commands::project::create(&name)?,
            ProjectAction::Add { slug, inputs } => commands::project::add(&slug, &inputs)?,
            ProjectAction::List { format } => commands::project::list(&format)?,
            ProjectAction::Show { slug } => commands::project::show(&slug)?,
            ProjectAction::Delete { slug, yes } => commands::project::delete(&slug, yes)?,
        },
        Commands::Status { format, detailed } => commands::status::run(&format, detailed)?,
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => commands::config::show(global, &format)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { global, force } => commands::config::init(global, force)?,
        },
    }

    Ok(())
}
