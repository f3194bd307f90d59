//! Catalog discovery and lesson resolution
//!
//! Turns the catalog's category pages into a flat, deduplicated list of
//! individually downloadable lesson URLs. Category pages are fetched
//! concurrently, one task per tag; series roots found on them are expanded
//! through a secondary fetch of the series page.

use std::collections::HashSet;

use log::warn;
use tokio::task::JoinHandle;
use url::Url;

use crate::core::error::{Error, Result};
use crate::core::pages::{self, Tag};
use crate::core::session::Session;

/// Shape of a lesson-like link found on a tag page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Standalone lesson page, downloadable as-is
    Lesson,
    /// One episode of a series, downloadable as-is
    Episode,
    /// Bare series page; expands to its episodes via a secondary fetch
    SeriesRoot,
    /// Navigation or anything else lesson-unrelated
    Other,
}

/// Classify an absolute URL by its path shape.
///
/// Priority matters: an episode URL also starts with `/series/`, so the
/// episode check runs before the bare-series check.
pub fn classify(url: &str) -> LinkKind {
    let Ok(parsed) = Url::parse(url) else {
        return LinkKind::Other;
    };
    let segments: Vec<&str> = match parsed.path_segments() {
        Some(segments) => segments.filter(|s| !s.is_empty()).collect(),
        None => return LinkKind::Other,
    };

    match segments.as_slice() {
        ["lessons", _, ..] => LinkKind::Lesson,
        ["series", _, "episodes", _, ..] => LinkKind::Episode,
        ["series", _, ..] => LinkKind::SeriesRoot,
        _ => LinkKind::Other,
    }
}

/// Crawls the catalog: lists tags, then resolves them into lesson URLs.
#[derive(Clone)]
pub struct Crawler {
    session: Session,
}

impl Crawler {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// List the catalog's category pages from the unauthenticated index.
    /// Duplicate links to the same tag URL are dropped, first seen wins.
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let url = self.session.join("/index")?;
        let html = self.session.get_page(url.as_str()).await?;
        Ok(pages::tag_index(&html, self.session.base()))
    }

    /// Resolve every tag into lesson URLs, concurrently, one task per tag.
    ///
    /// All tasks are joined before any result is inspected; each task
    /// returns its own local list and the merge happens here, in tag order,
    /// so the output is deterministic for a fixed catalog. Any tag that
    /// failed to resolve fails the whole pass.
    pub async fn resolve(&self, tags: Vec<Tag>) -> Result<Vec<String>> {
        let handles: Vec<JoinHandle<Result<Vec<String>>>> = tags
            .into_iter()
            .map(|tag| {
                let crawler = self.clone();
                tokio::spawn(async move { crawler.resolve_tag(&tag).await })
            })
            .collect();

        let mut per_tag: Vec<Result<Vec<String>>> = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .map_err(|e| Error::Http(format!("tag task failed: {e}")))?;
            per_tag.push(result);
        }

        let mut merged = Vec::new();
        for result in per_tag {
            merged.extend(result?);
        }
        Ok(dedup_urls(merged))
    }

    /// Resolve one tag page into lesson URLs, expanding series roots.
    pub async fn resolve_tag(&self, tag: &Tag) -> Result<Vec<String>> {
        let html = self.session.get_page(&tag.url).await?;
        let links = pages::lesson_links(&html, self.session.base());

        let mut urls = Vec::new();
        for link in links {
            match classify(&link) {
                LinkKind::Lesson | LinkKind::Episode => urls.push(link),
                LinkKind::SeriesRoot => match self.series_episodes(&link).await {
                    Ok(mut episodes) => urls.append(&mut episodes),
                    // A dead series page costs its episodes, not the tag.
                    Err(e) => warn!("skipping series {link}: {e}"),
                },
                LinkKind::Other => {}
            }
        }
        Ok(urls)
    }

    async fn series_episodes(&self, url: &str) -> Result<Vec<String>> {
        let html = self.session.get_page(url).await?;
        Ok(pages::series_episodes(&html, self.session.base()))
    }
}

/// Remove duplicate URLs, preserving first-seen order.
pub fn dedup_urls(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lesson() {
        assert_eq!(
            classify("https://courses.example.com/lessons/faster-workflow"),
            LinkKind::Lesson
        );
    }

    #[test]
    fn test_classify_episode() {
        assert_eq!(
            classify("https://courses.example.com/series/es6-cliffsnotes/episodes/16"),
            LinkKind::Episode
        );
    }

    #[test]
    fn test_classify_series_root() {
        assert_eq!(
            classify("https://courses.example.com/series/es6-cliffsnotes"),
            LinkKind::SeriesRoot
        );
        // Trailing slash is still a bare series page
        assert_eq!(
            classify("https://courses.example.com/series/es6-cliffsnotes/"),
            LinkKind::SeriesRoot
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify("https://courses.example.com/"), LinkKind::Other);
        assert_eq!(classify("https://courses.example.com/lessons"), LinkKind::Other);
        assert_eq!(classify("https://courses.example.com/series"), LinkKind::Other);
        assert_eq!(classify("https://courses.example.com/about"), LinkKind::Other);
        assert_eq!(classify("not a url"), LinkKind::Other);
    }

    #[test]
    fn test_dedup_urls_first_seen_order() {
        let urls = vec![
            "https://a.example.com/1".to_string(),
            "https://a.example.com/2".to_string(),
            "https://a.example.com/1".to_string(),
            "https://a.example.com/3".to_string(),
            "https://a.example.com/2".to_string(),
        ];
        assert_eq!(
            dedup_urls(urls),
            vec![
                "https://a.example.com/1",
                "https://a.example.com/2",
                "https://a.example.com/3",
            ]
        );
    }
}
