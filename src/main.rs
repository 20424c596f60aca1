//! commitscribe - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commitscribe::commit::{EditableSink, FileSink, MessageSink, Outcome, Pipeline, StdoutSink};
use commitscribe::credential::{CredentialManager, FileSecretStore, TerminalPrompt};
use commitscribe::{GeminiClient, GitDiffSource, Settings, resolve_repository_root};

/// Shown whenever the user declines to enter an API key.
const NO_CREDENTIAL_NOTICE: &str = "No API key provided; nothing was generated.";

/// Propose a Conventional Commit message for your staged changes.
#[derive(Parser, Debug)]
#[command(name = "commitscribe")]
#[command(about = "Propose a Conventional Commit message for your staged changes")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the staged changes (default)
    Generate(GenerateArgs),

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum KeyAction {
    /// Enter a new API key, replacing any stored one
    Set,
    /// Remove the stored API key
    Clear,
    /// Report whether an API key is stored
    Status,
}

#[derive(Args, Debug, Clone, Default)]
struct GenerateArgs {
    /// Repository to read staged changes from (defaults to the current directory)
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Model name (overrides COMMITSCRIBE_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Print the message without opening it for review
    #[arg(long, conflicts_with = "output")]
    print: bool,

    /// Write the message to a file, e.g. from a prepare-commit-msg hook
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::from_env();

    match cli.command {
        Some(Command::Key { action }) => run_key(action, &settings).await,
        Some(Command::Generate(args)) => run_generate(args, settings).await,
        None => run_generate(cli.generate, settings).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "commitscribe=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_generate(args: GenerateArgs, mut settings: Settings) -> Result<ExitCode> {
    if let Some(model) = args.model {
        settings.model = model;
    }

    // Step 1: Locate the repository (an explicit --repo wins over the cwd)
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let candidates: Vec<PathBuf> = args.repo.into_iter().chain(std::iter::once(cwd)).collect();
    let repo_root = resolve_repository_root(&candidates)?;

    // Step 2: Wire up credential storage, diff source and endpoint
    let store = FileSecretStore::new(settings.credentials_path()?);
    let credentials = CredentialManager::new(store, TerminalPrompt);
    let client = GeminiClient::new(&settings).context("Failed to build HTTP client")?;
    let pipeline = Pipeline::new(GitDiffSource::new(), client, credentials);

    let output_path = args.output.clone();
    let mut sink: Box<dyn MessageSink> = match (args.output, args.print) {
        (Some(path), _) => Box::new(FileSink::new(path)),
        (None, true) => Box::new(StdoutSink),
        (None, false) => Box::new(EditableSink),
    };

    // Step 3: Generate and deliver
    match pipeline.run(&repo_root, sink.as_mut()).await {
        Ok(Outcome::Delivered(_)) => {
            if let Some(path) = output_path {
                eprintln!("✓ Wrote commit message to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::NoStagedChanges) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_no_credential() => {
            eprintln!("{}", NO_CREDENTIAL_NOTICE);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_key(action: KeyAction, settings: &Settings) -> Result<ExitCode> {
    let path = settings.credentials_path()?;
    let credentials = CredentialManager::new(FileSecretStore::new(&path), TerminalPrompt);

    match action {
        KeyAction::Set => match credentials.replace_credential().await? {
            Some(_) => println!("✓ API key saved to {}", path.display()),
            None => {
                eprintln!("{}", NO_CREDENTIAL_NOTICE);
                return Ok(ExitCode::FAILURE);
            }
        },
        KeyAction::Clear => {
            if credentials.forget_credential().await? {
                println!("✓ Removed stored API key");
            } else {
                println!("No API key stored");
            }
        }
        KeyAction::Status => {
            if credentials.has_credential().await? {
                println!("API key stored in {}", path.display());
            } else {
                println!("No API key stored");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
