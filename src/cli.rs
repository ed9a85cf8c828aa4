use anyhow::{Context, Result};
use article_sync_core::files::LocalFiles;
use article_sync_core::{Article, ArticleSync, SaveOutcome, SyncError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::http::HttpTransport;
use crate::load_config::load_config;
use crate::prompt::TerminalPrompter;

/// CLI for article-sync: keep local frontmatter articles in sync with the remote CMS.
#[derive(Parser)]
#[clap(
    name = "article-sync",
    version,
    about = "Create, import, update, export, fetch and delete CMS articles"
)]
pub struct Cli {
    /// Optional YAML config file (articles_dir, service.url, service.username)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new article, prompting for every field
    New,
    /// Fetch an article by id, review its fields and save it back
    Update {
        /// Only prompt for fields that are still empty
        #[clap(long)]
        yes: bool,
    },
    /// Import a local document and create it remotely
    Load {
        /// Only prompt for fields that are still empty
        #[clap(long)]
        yes: bool,
    },
    /// Delete an article by id
    Delete,
    /// Fetch an article by id and print it as JSON
    Get,
    /// Fetch an article by id and write it as a local document
    Export,
}

/// Exit code for a run that stopped on a fatal (configuration) error.
pub const EXIT_FATAL: i32 = 2;
/// Exit code for any other failed run.
pub const EXIT_FAILURE: i32 = 1;

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let result = execute(cli).await;

    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| {
        tracing::info!(success = result.is_ok(), "article-sync finished");
    });

    result
}

/// Maps a failed run to its process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let fatal = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<SyncError>())
        .any(SyncError::is_fatal);
    if fatal {
        EXIT_FATAL
    } else {
        EXIT_FAILURE
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    config.trace_loaded();
    config
        .credentials
        .require_auth_key()
        .context("startup check failed")?;

    let transport = HttpTransport::new()?;
    let mut sync = ArticleSync::new(
        config.credentials,
        config.articles_dir,
        TerminalPrompter::new(),
        transport,
        LocalFiles,
    );

    match cli.command {
        Commands::New => report_save(sync.save_article(Article::default(), false).await?),
        Commands::Update { yes } => report_save(sync.update_article(yes).await?),
        Commands::Load { yes } => report_save(sync.load_article(yes).await?),
        Commands::Delete => {
            let id = sync.delete_article().await?;
            println!("Deleted article {id}");
            Ok(())
        }
        Commands::Get => {
            let article = sync.get_article().await?;
            println!("{}", serde_json::to_string_pretty(&article)?);
            Ok(())
        }
        Commands::Export => {
            let (article, path) = sync.export_article().await?;
            println!("Exported article {} to {}", article.id, path.display());
            Ok(())
        }
    }
}

/// Prints what happened locally and collapses the outcome into one result.
fn report_save(outcome: SaveOutcome) -> Result<()> {
    match &outcome.local {
        Ok(path) => println!("Saved document {}", path.display()),
        Err(e) => eprintln!("[WARN] Local document not written: {e}"),
    }
    if let Err(e) = &outcome.remote {
        eprintln!("[ERROR] Remote save failed: {e}");
    }
    let article = outcome.into_result()?;
    println!("Article \"{}\" is in sync", article.title);
    Ok(())
}
