mod config;
mod critique_client;
mod draft;
mod errors;
mod export;
mod feedback;
mod lifecycle;
mod notify;
mod render;
mod repl;
mod session;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::critique_client::CritiqueClient;
use crate::export::{CommandClipboard, FileExporter};
use crate::notify::LogNotifier;
use crate::render::render_result;
use crate::repl::{describe, Actions};
use crate::session::Session;

/// Sample requests offered on the input screen.
const EXAMPLE_REQUESTS: &[&str] = &[
    "I am applying for a frontend developer position. Please emphasise my React and TypeScript experience.",
    "Please write a cover letter centred on my backend development experience and problem-solving skills.",
    "Please write a cover letter that shows my passion and ability to learn as a new graduate developer.",
];

#[derive(Parser, Debug)]
#[command(name = "reviser")]
#[command(version)]
#[command(about = "AI critique and rewrite of IT cover letters.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send an essay and job description for critique and print the result
    Revise {
        /// Essay file, or `-` to read from stdin
        #[arg(long)]
        essay: PathBuf,

        /// Job description file
        #[arg(long)]
        job: PathBuf,

        /// Also save the finalized cover letter into this directory
        #[arg(long)]
        export: Option<PathBuf>,

        /// Also copy the finalized cover letter to the clipboard
        #[arg(long)]
        copy: bool,

        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Edit, submit, go back and resubmit from a command prompt
    Interactive {
        /// Default directory for `export`
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
    },

    /// Print example requests
    Examples,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Examples = cli.command {
        for example in EXAMPLE_REQUESTS {
            println!("- {example}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting reviser v{}", env!("CARGO_PKG_VERSION"));

    let client = CritiqueClient::new(&config.api_base_url, config.http_timeout)?;
    info!("Critique service endpoint: {}", client.endpoint());

    let mut session = Session::new(Arc::new(client), Arc::new(LogNotifier));

    match cli.command {
        Commands::Revise {
            essay,
            job,
            export,
            copy,
            json,
        } => {
            let essay_text = read_input(&essay).await?;
            let job_description = tokio::fs::read_to_string(&job)
                .await
                .with_context(|| format!("Failed to read job description {}", job.display()))?;

            let view = match session.submit(&essay_text, &job_description).await {
                Ok(view) => view.clone(),
                Err(e) => {
                    eprintln!("{}", describe(&e));
                    return Ok(ExitCode::FAILURE);
                }
            };
            if json {
                let body = serde_json::json!({
                    "view": &view,
                    "response": session.response(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", render_result(&view));
            }

            let mut status = ExitCode::SUCCESS;
            if copy {
                if let Err(e) = session.copy_result(&CommandClipboard::detect()).await {
                    error!(code = e.code(), "Copy failed: {e}");
                    status = ExitCode::FAILURE;
                }
            }
            if let Some(dir) = export {
                if let Err(e) = session.export_result(&FileExporter::new(dir)).await {
                    error!(code = e.code(), "Export failed: {e}");
                    status = ExitCode::FAILURE;
                }
            }
            Ok(status)
        }
        Commands::Interactive { export_dir } => {
            let actions = Actions {
                clipboard: Box::new(CommandClipboard::detect()),
                export_dir,
            };
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            repl::run(&mut session, stdin, &mut stdout, &actions).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Examples => Ok(ExitCode::SUCCESS),
    }
}

async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read essay from stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read essay {}", path.display()))
}
