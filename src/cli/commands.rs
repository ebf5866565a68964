use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::agent::{AgentClient, HttpAgentClient, UnconfiguredClient};
use crate::config::{AgentConfig, AppConfig};
use crate::models::DigestData;
use crate::session::{Session, validate_email};
use crate::storage::{DigestStorage, FileStore};
use crate::tui::{SharedClient, format_last_generated, run_interactive};
use crate::utils::{LogTarget, init_logging, sanitize};
use crate::view::{EmptyState, empty_state, findings_for, topic_groups};

#[derive(Parser)]
#[command(name = "parenting-digest")]
#[command(version = "0.1.0")]
#[command(about = "Generate and browse a parenting science research digest", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/parenting-digest/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the address the digest is sent to
    Email {
        /// Recipient email address
        address: String,
    },
    /// Ask the agent to research, write and send a digest now
    Generate,
    /// Print the last digest
    Show {
        /// Only show findings for this topic (case-insensitive)
        #[arg(long)]
        topic: Option<String>,
    },
    /// Show the saved email and when the last digest was generated
    Status,
    /// Forget the saved email and digest
    Reset,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;
    let data_dir = config.data_dir()?;

    let log_target =
        if cli.command.is_none() { LogTarget::File(data_dir.clone()) } else { LogTarget::Stderr };
    init_logging(log_target, cli.verbose)?;
    debug!(data_dir = %data_dir.display(), "configuration loaded");

    let storage = DigestStorage::new(FileStore::open(&data_dir)?);

    match cli.command {
        None => {
            let session = Session::load(storage, config.ui.save_delay());
            run_interactive(session, build_client(&config.agent)?)
        }
        Some(Commands::Email { address }) => save_email(&storage, &address),
        Some(Commands::Generate) => {
            let client = build_client(&config.agent)?;
            generate(Session::load(storage, config.ui.save_delay()), client.as_ref())
        }
        Some(Commands::Show { topic }) => show_digest(&storage, topic.as_deref()),
        Some(Commands::Status) => show_status(&storage, &config),
        Some(Commands::Reset) => {
            storage.clear()?;
            println!("Cleared saved email and digest");
            Ok(())
        }
    }
}

fn build_client(config: &AgentConfig) -> Result<SharedClient> {
    if !config.is_configured() {
        debug!("no agent endpoint configured");
        return Ok(Arc::new(UnconfiguredClient));
    }
    let client = HttpAgentClient::new(config).context("Failed to create agent client")?;
    Ok(Arc::new(client))
}

fn save_email(storage: &DigestStorage<FileStore>, address: &str) -> Result<()> {
    let address = address.trim();
    validate_email(address)?;
    storage.save_email(address)?;
    println!("Email address saved successfully!");
    Ok(())
}

fn generate(
    mut session: Session<FileStore>,
    client: &(dyn AgentClient + Send + Sync),
) -> Result<()> {
    if let Err(e) = session.generate(client) {
        anyhow::bail!(e.user_message());
    }

    if let Some(notification) = session.notification().current() {
        println!("{}", notification.message);
    }
    if let Some(digest) = session.digest() {
        let topics = topic_groups(digest).len();
        println!("{} findings across {} topics", digest.findings().len(), topics);
    }
    Ok(())
}

fn show_digest(storage: &DigestStorage<FileStore>, topic: Option<&str>) -> Result<()> {
    let digest = storage.load_digest()?;
    let Some(digest) = digest.as_ref() else {
        println!("{}", EmptyState::NoDigest.message());
        return Ok(());
    };

    print_header(digest);

    let groups = topic_groups(digest);
    if !groups.is_empty() {
        let pills: Vec<String> =
            groups.iter().map(|g| format!("{} ({})", sanitize(&g.label), g.count)).collect();
        println!("Topics: {}", pills.join(", "));
    }
    println!();

    if let Some(empty) = empty_state(Some(digest), topic) {
        println!("{}", empty.message());
        return Ok(());
    }

    for finding in findings_for(digest, topic) {
        println!("• {}", sanitize(&finding.title));
        println!(
            "  {} | {} | {} | credibility: {}",
            sanitize(&finding.source),
            sanitize(&finding.date_published),
            sanitize(&finding.topic_area),
            sanitize(&finding.credibility_score)
        );
        println!("  {}", sanitize(&finding.key_finding));
        if let Some(implication) = &finding.actionable_implication {
            println!("  What you can do: {}", sanitize(implication));
        }
        if let Some(url) = &finding.url {
            println!("  {}", sanitize(url));
        }
        println!();
    }

    Ok(())
}

fn print_header(digest: &DigestData) {
    match &digest.workflow {
        Some(workflow) => {
            println!("{}", sanitize(&workflow.digest_title));
            println!("Sent to: {}", sanitize(&workflow.email_sent_to));
        }
        None => println!("Sent to: {}", sanitize(&digest.email)),
    }
    println!("Generated: {}", digest.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(research) = &digest.research {
        println!("Total findings: {}", research.total_findings);
    }
}

fn show_status(storage: &DigestStorage<FileStore>, config: &AppConfig) -> Result<()> {
    let email = storage.load_email()?;
    let last_generated = storage.load_last_generated()?;
    let digest = storage.load_digest()?;

    println!("Parenting Science Digest");
    println!("========================");
    println!("Email: {}", email.as_deref().unwrap_or("not set"));
    match last_generated {
        Some(ts) => println!("Last generated: {}", format_last_generated(&ts, &Utc::now())),
        None => println!("Last generated: never"),
    }
    if let Some(digest) = &digest {
        println!("Findings: {}", digest.findings().len());
    }
    println!(
        "Agent endpoint: {}",
        if config.agent.is_configured() { config.agent.endpoint.as_str() } else { "not configured" }
    );
    println!("Data file: {}", storage.store().path().display());

    Ok(())
}
