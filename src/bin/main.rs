use clap::{Args, Parser, Subcommand};
use commit_summary::{
    self, CommitSession, DelegateConfig, Error, FileChangeRecord, GeneratedMessage, MessageSource,
};
use dialoguer::{Confirm, Input, MultiSelect};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Working directory (defaults to the current directory)
    #[arg(global = true, short, long, env = "COMMIT_SUMMARY_DIR")]
    dir: Option<PathBuf>,

    #[command(flatten)]
    delegate: DelegateArgs,

    /// Log level
    #[arg(global = true, short, long, default_value = "error")]
    log: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DelegateArgs {
    /// Endpoint that generates the message instead of the local summary
    #[arg(global = true, long, env = "COMMIT_SUMMARY_DELEGATE_URL")]
    delegate_url: Option<String>,

    /// Delegate request timeout in seconds
    #[arg(
        global = true,
        long,
        env = "COMMIT_SUMMARY_DELEGATE_TIMEOUT",
        default_value_t = commit_summary::DEFAULT_DELEGATE_TIMEOUT.as_secs()
    )]
    delegate_timeout: u64,
}

impl DelegateArgs {
    fn message_source(&self) -> commit_summary::Result<MessageSource> {
        match &self.delegate_url {
            Some(url) => Ok(MessageSource::Delegate(
                DelegateConfig::new(url)?
                    .with_timeout(Duration::from_secs(self.delegate_timeout)),
            )),
            None => Ok(MessageSource::Local),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List changed files in the working tree
    Status {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactively pick files, generate a message, edit and commit it
    Pick {
        /// Preselect every changed file
        #[arg(short, long)]
        all: bool,
    },
    /// Stage the given files and print a generated message
    Generate {
        /// Comma-separated list of files to include
        #[arg(short, long, value_delimiter = ',', required_unless_present = "all")]
        files: Vec<String>,

        /// Include every changed file
        #[arg(short, long, conflicts_with = "files")]
        all: bool,

        /// Free-text instructions used as the message prefix
        #[arg(short, long)]
        instructions: Option<String>,

        /// Commit with the generated message
        #[arg(long)]
        commit: bool,

        /// Print the message and diff facts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Commit staged content with the given message
    Commit {
        #[arg(short, long)]
        message: String,
    },
}

fn io_error(e: &dialoguer::Error) -> Error {
    Error::IoError(std::io::Error::other(e.to_string()))
}

fn print_status(records: &[FileChangeRecord]) {
    if records.is_empty() {
        println!("✨ Working tree clean");
        return;
    }

    println!("\n📊 Changed Files:");
    println!("================");
    for record in records {
        println!("  {} {}", record.state().marker(), record.path);
    }
    println!("\nTotal files: {}", records.len());
}

fn print_generated(generated: &GeneratedMessage, json: bool) -> commit_summary::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(generated)
            .map_err(|e| Error::IoError(std::io::Error::other(e)))?;
        println!("{out}");
    } else {
        println!("{}", generated.message);
    }
    Ok(())
}

fn all_paths(records: &[FileChangeRecord]) -> Vec<String> {
    records.iter().map(|r| r.path.clone()).collect()
}

async fn pick(
    session: &mut CommitSession,
    source: &MessageSource,
    all: bool,
) -> commit_summary::Result<()> {
    let records = session.list_changes()?;
    if records.is_empty() {
        println!("✨ Working tree clean");
        return Ok(());
    }

    let labels: Vec<String> = records
        .iter()
        .map(|r| format!("[{}] {}", r.state().marker(), r.path))
        .collect();
    let defaults = vec![all; labels.len()];

    let Some(chosen) = MultiSelect::new()
        .with_prompt("Select files (space toggles, a toggles all)")
        .items(&labels)
        .defaults(&defaults)
        .interact_opt()
        .map_err(|e| io_error(&e))?
    else {
        debug!("Selection cancelled");
        return Ok(());
    };
    let selected: Vec<String> = chosen.iter().map(|&i| records[i].path.clone()).collect();

    let instructions: String = Input::new()
        .with_prompt("Instructions (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io_error(&e))?;

    let generated = session
        .generate_message(&selected, Some(instructions.as_str()), source)
        .await?;

    let message: String = Input::new()
        .with_prompt("Commit message")
        .with_initial_text(generated.message)
        .interact_text()
        .map_err(|e| io_error(&e))?;

    let confirmed = Confirm::new()
        .with_prompt(format!("Commit {} file(s)?", selected.len()))
        .default(true)
        .interact()
        .map_err(|e| io_error(&e))?;
    if confirmed {
        session.commit(&message)?;
        println!("✅ Committed: {message}");
    }
    Ok(())
}

async fn run(cli: Cli) -> commit_summary::Result<()> {
    let source = cli.delegate.message_source()?;
    let mut session = commit_summary::open(cli.dir.as_deref())?;
    debug!(repo_path = %session.repo_path().display(), "Session opened");

    match cli.command {
        Commands::Status { json } => {
            let records = session.list_changes()?;
            if json {
                let out = serde_json::to_string_pretty(&records)
                    .map_err(|e| Error::IoError(std::io::Error::other(e)))?;
                println!("{out}");
            } else {
                print_status(&records);
            }
        }
        Commands::Pick { all } => pick(&mut session, &source, all).await?,
        Commands::Generate {
            files,
            all,
            instructions,
            commit,
            json,
        } => {
            let selected = if all {
                all_paths(&session.list_changes()?)
            } else {
                files
            };
            let generated = session
                .generate_message(&selected, instructions.as_deref(), &source)
                .await?;
            print_generated(&generated, json)?;
            if commit {
                session.commit(&generated.message)?;
            }
        }
        Commands::Commit { message } => session.commit(&message)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(cli.log.into());

    fmt()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .pretty()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
