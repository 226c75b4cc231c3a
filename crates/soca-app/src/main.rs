use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, Subcommand};
use eyre::Result;

use soca_app::commands::{self, completion_client};
use soca_app::config::{self, SocaConfig};
use soca_app::session::Session;
use soca_client::backend::BackendClient;
use soca_client::blob::BlobStore;
use soca_client::service::ChatCompletionService;
use soca_core::export::followup_download_name;
use soca_text::{LocalTextExtractor, UploadedFile};

#[derive(Parser)]
#[command(name = "soca", version, about = "Analyse and compare submitted documents")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a batch of submissions
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Upload this criteria document before analysing
        #[arg(long)]
        criteria: Option<PathBuf>,
        /// Print the comparative summary of the batch
        #[arg(long)]
        summary: bool,
        /// Print follow-up questions for the named submission
        #[arg(long, value_name = "NAME")]
        followups: Vec<String>,
        /// Directory to save follow-up questions into
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Write the results as CSV
        #[arg(long, value_name = "CSV")]
        export: Option<PathBuf>,
    },
    /// Upload a new evaluation criteria document
    Criteria { file: PathBuf },
    /// Rate an analysis
    #[command(group(ArgGroup::new("rating").required(true).args(["positive", "negative"])))]
    Feedback {
        #[arg(long)]
        thread: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        positive: bool,
        #[arg(long)]
        negative: bool,
    },
    /// Print the message history of a thread
    Conversation { thread: String },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets redacted
    Show,
    /// Write a default config file if none exists
    Init,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match &cli.config {
        Some(path) => config::load_config_at(path)?,
        None => config::load_config()?,
    };

    match cli.command {
        Command::Analyze {
            files,
            criteria,
            summary,
            followups,
            out_dir,
            export,
        } => {
            if let Some(criteria) = criteria {
                upload_criteria(&config, &criteria)?;
            }
            analyze(&config, &files, summary, &followups, out_dir, export)
        }
        Command::Criteria { file } => upload_criteria(&config, &file),
        Command::Feedback {
            thread,
            message,
            positive,
            negative: _,
        } => {
            let backend = BackendClient::new(config.backend());
            let response = commands::submit_feedback(&backend, &thread, &message, positive)?;
            println!(
                "{}",
                response
                    .message
                    .unwrap_or_else(|| "Feedback submitted".to_string())
            );
            Ok(())
        }
        Command::Conversation { thread } => {
            let backend = BackendClient::new(config.backend());
            let messages = backend.get_conversation(&thread)?;
            println!("{}", serde_json::to_string_pretty(&messages)?);
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let info = config::config_info(&config);
                println!("{}", serde_json::to_string_pretty(&info)?);
                Ok(())
            }
            ConfigAction::Init => {
                let path = match cli.config {
                    Some(path) => path,
                    None => config::config_path()?,
                };
                if path.exists() {
                    println!("config already exists at {}", path.display());
                } else {
                    config::save_config_to(&path, &SocaConfig::default())?;
                    println!("wrote {}", path.display());
                }
                Ok(())
            }
        },
    }
}

fn analyze(
    config: &SocaConfig,
    paths: &[PathBuf],
    summary: bool,
    followups: &[String],
    out_dir: Option<PathBuf>,
    export: Option<PathBuf>,
) -> Result<()> {
    let files = paths
        .iter()
        .map(|p| UploadedFile::read(p))
        .collect::<Result<Vec<_>, _>>()?;

    let backend = BackendClient::new(config.backend());
    let mut session = Session::new();

    let report = commands::process_submissions(
        &mut session,
        &files,
        &LocalTextExtractor,
        &backend,
        |fraction| eprintln!("progress: {:>3.0}%", fraction * 100.0),
    );
    for skipped in &report.skipped {
        eprintln!("Error processing {}: {}", skipped.name, skipped.error);
    }

    for record in session.results() {
        println!("{}\n", record.display_markdown());
    }
    if session.results().is_empty() {
        return Ok(());
    }
    println!("{}", commands::results_table(&session));

    let client = completion_client(config.openai());
    let model = client.as_ref().map(|c| c as &dyn ChatCompletionService);

    if summary {
        let text = commands::comparative_summary(&mut session, model)?;
        println!("## Comparative Summary\n\n{text}\n");
    }

    for name in followups {
        let questions = commands::followup_questions(&mut session, name, model)?;
        println!("## Follow-up Questions: {name}\n\n{questions}\n");
        if let Some(dir) = &out_dir {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(followup_download_name(name));
            std::fs::write(&path, &questions)?;
            eprintln!("saved {}", path.display());
        }
    }

    if let Some(path) = export {
        commands::export_csv(&session, &path)?;
        eprintln!("exported {}", path.display());
    }

    Ok(())
}

fn upload_criteria(config: &SocaConfig, path: &Path) -> Result<()> {
    let store = BlobStore::from_url(&config.blob_storage_url)?;
    let blob_name = store
        .storage_url()
        .blob
        .clone()
        .unwrap_or_else(|| config.criteria_blob.clone());

    let file = UploadedFile::read(path)?;
    let criteria =
        commands::update_criteria_from_file(&file, &LocalTextExtractor, &store, &blob_name)?;
    println!(
        "criteria updated: {} ({} chars)",
        blob_name,
        criteria.job_criteria_text.len()
    );
    Ok(())
}
