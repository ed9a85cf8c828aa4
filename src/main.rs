use anyhow::Result;
use article_sync::cli::exit_code;
use article_sync::{run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let code = exit_code(&e);
            tracing::error!(error = ?e, code, "article-sync failed");
            eprintln!("[ERROR] {e:#}");
            std::process::exit(code);
        }
    }
}
