//! # course-dl
//!
//! Crawls an authenticated course catalog into a flat list of lesson URLs
//! and downloads each lesson's video to disk, idempotently across runs.
//!
//! The pipeline has two halves:
//!
//! - **Discovery** ([`Crawler`]): the catalog's category pages are fetched
//!   concurrently and every lesson-like link on them is classified and,
//!   for bare series pages, expanded into individual episodes. The
//!   deduplicated result is persisted through [`ManifestStore`] so a crawl
//!   only ever runs once.
//! - **Download** ([`DownloadEngine`]): after [`Authenticator`] has logged
//!   the shared [`Session`] in, each manifest URL is turned into a file on
//!   disk, named from the remote `Content-Disposition` header and grouped
//!   into a per-series subdirectory when the lesson belongs to one.
//!   Already-downloaded files are detected by size and skipped.
//!
//! ```no_run
//! use course_dl::{Authenticator, Crawler, DownloadEngine, DownloadOptions, Session};
//!
//! #[tokio::main]
//! async fn main() -> course_dl::Result<()> {
//!     let session = Session::new("https://laracasts.com")?;
//!
//!     let crawler = Crawler::new(session.clone());
//!     let tags = crawler.list_tags().await?;
//!     let urls = crawler.resolve(tags).await?;
//!
//!     Authenticator::new(session.clone()).login("me@example.com", "secret").await?;
//!     DownloadEngine::new(session, "./downloads")
//!         .download_all(&urls, &DownloadOptions::default())
//!         .await
//! }
//! ```

pub mod core;

pub use core::auth::Authenticator;
pub use core::catalog::{classify, Crawler, LinkKind};
pub use core::downloader::{DownloadEngine, DownloadOptions, DownloadOutcome, ProgressCallback};
pub use core::error::{Error, Result};
pub use core::manifest::ManifestStore;
pub use core::pages::{LessonPage, Series, Tag};
pub use core::session::Session;
