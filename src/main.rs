//! ReconX - Security scan dashboard in the terminal
//!
//! Lists scan reports, runs simulated scans, exports reports and asks an AI
//! assistant for remediation advice.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use reconx::ai::AiProviderKind;
use reconx::errors::ReconxError;
use reconx::reporter::ExportFormat;
use reconx::ScanProfile;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{commands, AiOverrides, OutputFormat};

/// ReconX - Threat analysis dashboard
#[derive(Parser)]
#[command(
    name = "reconx",
    version,
    about = "Security scan dashboard with simulated scans and AI-assisted remediation",
    long_about = "ReconX keeps scan reports, runs simulated scans and asks an AI assistant\n\
                  (Gemini by default) for remediation plans.\n\n\
                  Set GEMINI_API_KEY, or use --provider ollama for a local model."
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (default: .reconx.toml, reconx.toml, ~/.config/reconx/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// AI provider override
    #[arg(long, global = true, value_enum)]
    provider: Option<CliAiProvider>,

    /// AI model override
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliAiProvider {
    Gemini,
    Openai,
    Ollama,
}

impl From<CliAiProvider> for AiProviderKind {
    fn from(provider: CliAiProvider) -> Self {
        match provider {
            CliAiProvider::Gemini => AiProviderKind::Gemini,
            CliAiProvider::Openai => AiProviderKind::OpenAI,
            CliAiProvider::Ollama => AiProviderKind::Ollama,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum CliScanProfile {
    #[default]
    Quick,
    Full,
}

impl From<CliScanProfile> for ScanProfile {
    fn from(profile: CliScanProfile) -> Self {
        match profile {
            CliScanProfile::Quick => ScanProfile::Quick,
            CliScanProfile::Full => ScanProfile::Full,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all scan reports
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a completed report in detail
    Show {
        /// Report id (e.g. scan-001)
        report: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run a simulated scan and wait for the result
    Scan {
        /// Target host or URL
        target: String,

        /// Scan profile
        #[arg(short, long, default_value = "quick")]
        profile: CliScanProfile,

        /// Cancel the scan after this many seconds
        #[arg(long)]
        cancel_after: Option<u64>,
    },

    /// Export a report to Markdown or JSON
    Export {
        /// Report id
        report: String,

        /// Export format
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Run AI analysis for every vulnerability first (Markdown only)
        #[arg(long)]
        with_analysis: bool,
    },

    /// Ask the AI assistant for a remediation plan
    Analyze {
        /// Report id
        report: String,

        /// Vulnerability id
        vulnerability: String,
    },

    /// Chat with the AI assistant
    Chat {
        /// Report to discuss (omit for a general conversation)
        #[arg(short, long)]
        report: Option<String>,

        /// Send a single message instead of starting an interactive session
        #[arg(short, long)]
        message: Option<String>,
    },
}

fn init_logging(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbosity {
            0 => EnvFilter::new("reconx=info"),
            1 => EnvFilter::new("reconx=debug"),
            2 => EnvFilter::new("reconx=trace"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = AiOverrides {
        provider: cli.provider.map(Into::into),
        model: cli.model,
    };
    let dashboard = cli::load_dashboard(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Commands::List { format } => commands::list::run(&dashboard, format)?,
        Commands::Show { report, format } => commands::show::run(&dashboard, &report, format)?,
        Commands::Scan {
            target,
            profile,
            cancel_after,
        } => commands::scan::run(&dashboard, &target, profile.into(), cancel_after).await?,
        Commands::Export {
            report,
            format,
            output,
            with_analysis,
        } => commands::export::run(&dashboard, &report, format, &output, with_analysis).await?,
        Commands::Analyze {
            report,
            vulnerability,
        } => commands::analyze::run(&dashboard, &report, &vulnerability).await?,
        Commands::Chat { report, message } => {
            commands::chat::run(&dashboard, report.as_deref(), message.as_deref()).await?
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        match err.downcast::<ReconxError>() {
            Ok(diagnostic) => eprintln!("{:?}", miette::Report::new(diagnostic)),
            Err(err) => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        std::process::exit(1);
    }
}
