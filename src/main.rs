//! # course-dl CLI
//!
//! Command-line interface for the course-dl library. Crawls the catalog once
//! into a manifest file, then logs in and downloads every lesson in it.

use std::sync::Arc;

use clap::Parser;
use course_dl::{
    Authenticator, Crawler, DownloadEngine, DownloadOptions, ManifestStore, Result, Session,
};
use log::{error, info};

mod cli;

/// Command-line interface for course-dl
#[derive(Parser)]
#[command(name = "course-dl")]
#[command(about = "Course catalog crawler and video lesson downloader")]
#[command(long_about = "Discovers every lesson behind the catalog's category pages and
downloads the videos, resumably across runs:

  course-dl me@example.com secret            # download into the current directory
  course-dl me@example.com secret ./videos   # download into ./videos
  course-dl me@example.com secret --dry-run  # crawl and list, download nothing

The resolved lesson URLs are cached in a manifest file (lessons.txt by
default); delete it to force a fresh crawl. Files that already exist with
the expected size are skipped, never overwritten.")]
#[command(version)]
struct Cli {
    /// Account username (email) for the catalog
    username: String,

    /// Account password
    password: String,

    /// Output directory for downloaded lessons
    #[arg(default_value = ".")]
    directory: String,

    /// Manifest file caching the resolved lesson URLs
    #[arg(long, default_value = "lessons.txt")]
    manifest: String,

    /// Base origin of the catalog
    #[arg(long, default_value = "https://laracasts.com")]
    base_url: String,

    /// Crawl and print the lesson URLs without logging in or downloading
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("course-dl v{} starting...", env!("CARGO_PKG_VERSION"));
    }

    let session = Session::new(&cli.base_url)?;
    let manifest = ManifestStore::new(&cli.manifest);

    if !manifest.exists() {
        let crawler = Crawler::new(session.clone());

        let tags = crawler.list_tags().await?;
        info!("Found {} tags", tags.len());

        let urls = crawler.resolve(tags).await?;
        info!("Found {} lesson urls", urls.len());

        manifest.write(&urls)?;
        info!("Wrote {} lesson urls to {}", urls.len(), manifest.path().display());
    }

    let urls = manifest.read()?;

    if cli.dry_run {
        for url in &urls {
            println!("{url}");
        }
        return Ok(());
    }

    info!("Logging in");
    Authenticator::new(session.clone())
        .login(&cli.username, &cli.password)
        .await?;

    let progress_manager = cli::ProgressManager::new();
    let options = DownloadOptions {
        progress: Some(Arc::new({
            let pm = progress_manager.clone();
            move |downloaded, total| pm.update(downloaded, total)
        })),
    };

    let engine = DownloadEngine::new(session, &cli.directory);
    engine.download_all(&urls, &options).await?;
    progress_manager.finish();

    Ok(())
}
