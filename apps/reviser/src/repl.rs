//! Interactive terminal front end.
//!
//! Reads one command per line and keeps the session alive across failed
//! requests. While a critique is in flight the loop keeps reading lines, so
//! commands issued meanwhile are answered by the lifecycle (busy, not
//! applicable) instead of being queued.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::critique_client::{CritiqueResponse, TransportError};
use crate::errors::AppError;
use crate::export::{Clipboard, FileExporter};
use crate::lifecycle::{Generation, Screen};
use crate::render::render_result;
use crate::session::{CritiqueFuture, Session};
use crate::EXAMPLE_REQUESTS;

const HELP: &str = "\
Commands:
  essay <file>    load the essay text
  job <file>      load the job description
  submit          send both for critique
  show            print the current result
  back            return to the input screen
  copy            copy the cover letter to the clipboard
  export [dir]    save the cover letter as cover_letter.txt
  examples        list example requests
  help            show this text
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Essay(PathBuf),
    Job(PathBuf),
    Submit,
    Show,
    Back,
    Copy,
    Export(Option<PathBuf>),
    Examples,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let path = |what: &str| {
        if rest.is_empty() {
            Err(format!("`{verb}` needs a {what} path"))
        } else {
            Ok(PathBuf::from(rest))
        }
    };

    match verb {
        "essay" => path("file").map(Command::Essay),
        "job" => path("file").map(Command::Job),
        "submit" => Ok(Command::Submit),
        "show" => Ok(Command::Show),
        "back" => Ok(Command::Back),
        "copy" => Ok(Command::Copy),
        "export" if rest.is_empty() => Ok(Command::Export(None)),
        "export" => Ok(Command::Export(Some(PathBuf::from(rest)))),
        "examples" => Ok(Command::Examples),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command `{other}`; type `help`")),
    }
}

/// Where side effects go.
pub struct Actions {
    pub clipboard: Box<dyn Clipboard>,
    pub export_dir: PathBuf,
}

/// Text held on the input screen; survives failures and `back`.
#[derive(Debug, Default)]
struct Inputs {
    essay_text: Option<String>,
    job_description: Option<String>,
}

enum Wake {
    Done(Result<CritiqueResponse, TransportError>),
    Line(io::Result<Option<String>>),
}

enum Flow {
    Continue,
    Quit,
}

/// Runs the command loop until `quit` or end of input.
///
/// At end of input a request still in flight is awaited and its outcome
/// reported before returning.
pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W, actions: &Actions) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut inputs = Inputs::default();
    let mut in_flight: Option<(Generation, CritiqueFuture)> = None;

    say(out, "Type `help` for commands.").await?;

    loop {
        let wake = match in_flight.as_mut() {
            Some((_, request)) => tokio::select! {
                biased;
                outcome = request => Wake::Done(outcome),
                line = lines.next_line() => Wake::Line(line),
            },
            None => Wake::Line(lines.next_line().await),
        };

        match wake {
            Wake::Done(outcome) => {
                if let Some((generation, _)) = in_flight.take() {
                    report_outcome(session, generation, outcome, out).await?;
                }
            }
            Wake::Line(line) => {
                let Some(line) = line? else {
                    if let Some((generation, request)) = in_flight.take() {
                        let outcome = request.await;
                        report_outcome(session, generation, outcome, out).await?;
                    }
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        say(out, &message).await?;
                        continue;
                    }
                };
                debug!(?command, "command");
                let flow =
                    handle(session, command, &mut inputs, &mut in_flight, out, actions).await?;
                if let Flow::Quit = flow {
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn handle<W>(
    session: &mut Session,
    command: Command,
    inputs: &mut Inputs,
    in_flight: &mut Option<(Generation, CritiqueFuture)>,
    out: &mut W,
    actions: &Actions,
) -> Result<Flow>
where
    W: AsyncWrite + Unpin,
{
    match command {
        Command::Essay(path) => {
            if let Some(text) = load(&path, out).await? {
                say(out, &format!("Essay loaded ({} chars)", text.chars().count())).await?;
                inputs.essay_text = Some(text);
            }
        }
        Command::Job(path) => {
            if let Some(text) = load(&path, out).await? {
                say(out, &format!("Job description loaded ({} chars)", text.chars().count()))
                    .await?;
                inputs.job_description = Some(text);
            }
        }
        Command::Submit => {
            let essay_text = inputs.essay_text.as_deref().unwrap_or("");
            let job_description = inputs.job_description.as_deref().unwrap_or("");
            match session.begin(essay_text, job_description) {
                Ok(pending) => {
                    say(out, &format!("Submitting {}...", pending.generation)).await?;
                    *in_flight = Some((pending.generation, session.dispatch(&pending)));
                }
                Err(e) => report_error(out, &e).await?,
            }
        }
        Command::Show => match session.view_model() {
            Some(view) => {
                let text = render_result(view);
                say(out, &text).await?;
            }
            None => match session.in_flight() {
                Some(generation) => say(out, &format!("Request {generation} still in flight")).await?,
                None => {
                    let screen = session.current_state();
                    say(out, &format!("No result on the {screen:?} screen")).await?;
                }
            },
        },
        Command::Back => match session.back() {
            Ok(()) => say(out, "Back on the input screen").await?,
            Err(e) => report_error(out, &e).await?,
        },
        Command::Copy => {
            if let Err(e) = session.copy_result(actions.clipboard.as_ref()).await {
                report_error(out, &e).await?;
            }
        }
        Command::Export(dir) => {
            let exporter = FileExporter::new(dir.unwrap_or_else(|| actions.export_dir.clone()));
            match session.export_result(&exporter).await {
                Ok(path) => say(out, &format!("Saved {}", path.display())).await?,
                Err(e) => report_error(out, &e).await?,
            }
        }
        Command::Examples => {
            for example in EXAMPLE_REQUESTS {
                say(out, &format!("- {example}")).await?;
            }
        }
        Command::Help => say(out, HELP).await?,
        Command::Quit => {
            if let Some((generation, _)) = in_flight.take() {
                warn!("Abandoning request {generation}");
            }
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

async fn report_outcome<W>(
    session: &mut Session,
    generation: Generation,
    outcome: Result<CritiqueResponse, TransportError>,
    out: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match session.resolve(generation, outcome) {
        Ok(Some(view)) => {
            let text = render_result(view);
            say(out, &text).await?;
        }
        Ok(None) => say(out, &format!("Ignored stale response {generation}")).await?,
        Err(e) => {
            report_error(out, &e).await?;
            if session.current_state() == Screen::Input {
                say(out, "Inputs kept; edit them and `submit` again").await?;
            }
        }
    }
    Ok(())
}

async fn load<W>(path: &std::path::Path, out: &mut W) -> Result<Option<String>>
where
    W: AsyncWrite + Unpin,
{
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            say(out, &format!("Could not read {}: {e}", path.display())).await?;
            Ok(None)
        }
    }
}

pub fn describe(err: &AppError) -> String {
    format!("error [{}]: {err}", err.code())
}

async fn report_error<W>(out: &mut W, err: &AppError) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    say(out, &describe(err)).await
}

async fn say<W>(out: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}
