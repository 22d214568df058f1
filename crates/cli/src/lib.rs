pub mod commands;

use clap::{Args, Parser, Subcommand};
use docflow_core::config::{AppConfig, LoadOptions, LogFormat};
use std::process::ExitCode;

use commands::dashboard::DashboardArgs;
use commands::transition::TransitionRequest;
use commands::DocumentArgs;

#[derive(Debug, Parser)]
#[command(
    name = "docflow",
    about = "Docflow operator CLI",
    long_about = "Move finance documents through their approval chain, inspect dashboards, and check configuration.",
    after_help = "Examples:\n  docflow config\n  docflow advance --kind ar-invoice --id STG-12 --from prepared --actor u-check\n  docflow reject --kind reimbursement --id 41 --actor u-ack --reason \"missing receipt\"\n  docflow dashboard --kind settlement --tab checked --page 2"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct DocumentOpts {
    #[arg(long, help = "Document type, e.g. ar-invoice, reimbursement, cash-advance")]
    kind: String,
    #[arg(long, help = "Document identifier")]
    id: String,
    #[arg(long, help = "Current approval status; fetched from the backend when omitted")]
    from: Option<String>,
    #[arg(long, help = "Acting user id")]
    actor: String,
    #[arg(long, help = "Acting user display name (defaults to the id)")]
    actor_name: Option<String>,
}

impl From<DocumentOpts> for DocumentArgs {
    fn from(opts: DocumentOpts) -> Self {
        Self {
            kind: opts.kind,
            id: opts.id,
            from: opts.from,
            actor: opts.actor,
            actor_name: opts.actor_name,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Move a document to the next stage of its approval chain")]
    Advance {
        #[command(flatten)]
        document: DocumentOpts,
    },
    #[command(about = "Reject a document; a non-blank reason is required")]
    Reject {
        #[command(flatten)]
        document: DocumentOpts,
        #[arg(long)]
        reason: String,
    },
    #[command(about = "Send a document back for revision; non-blank remarks are required")]
    Revise {
        #[command(flatten)]
        document: DocumentOpts,
        #[arg(long)]
        remarks: String,
    },
    #[command(about = "List documents of a type through a dashboard tab, search and page")]
    Dashboard {
        #[arg(long)]
        kind: String,
        #[arg(long, help = "all, a status such as checked, or reached:<status>")]
        tab: Option<String>,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, help = "document-number, counterparty, date, status or any")]
        field: Option<String>,
    },
    #[command(about = "Drive a document through every remaining stage, one call per stage")]
    Drive {
        #[command(flatten)]
        document: DocumentOpts,
    },
    #[command(about = "Spell an amount out in words")]
    Words { amount: String },
    #[command(about = "Format an amount with id-ID separators")]
    Currency { amount: String },
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // stdout carries the command result.
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);
    match config.logging.format {
        Compact => {
            builder.compact().init();
        }
        Pretty => {
            builder.pretty().init();
        }
        Json => {
            builder.json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Advance { document } => {
            commands::transition::run(document.into(), TransitionRequest::Advance)
        }
        Command::Reject { document, reason } => {
            commands::transition::run(document.into(), TransitionRequest::Reject { reason })
        }
        Command::Revise { document, remarks } => {
            commands::transition::run(document.into(), TransitionRequest::Revise { remarks })
        }
        Command::Dashboard { kind, tab, page, search, field } => {
            commands::dashboard::run(DashboardArgs { kind, tab, page, search, field })
        }
        Command::Drive { document } => commands::drive::run(document.into()),
        Command::Words { amount } => commands::format::words(&amount),
        Command::Currency { amount } => commands::format::currency(&amount),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
