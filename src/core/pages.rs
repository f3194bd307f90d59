//! Page interpreters
//!
//! All knowledge of the catalog's markup lives here, one pure extraction
//! function per page type. Orchestration code hands in the fetched body and
//! gets typed values back, so markup drift is contained to this module.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static LOGIN_TOKEN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("login-button[token]").expect("valid selector"));
static TAG_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#index li > a").expect("valid selector"));
static LESSON_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".Lesson-List li a").expect("valid selector"));
static EPISODE_TITLES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".Lesson-List__title a").expect("valid selector"));
static SERIES_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".Video__body h2 a").expect("valid selector"));
static DOWNLOAD_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='/downloads']").expect("valid selector"));

/// A catalog category page. Identity is the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub url: String,
}

/// Series grouping derived from a lesson page; groups the downloaded file
/// into a subdirectory named after the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// What a lesson page tells the download engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPage {
    pub series: Option<Series>,
    pub download_url: Option<String>,
}

/// Extract the login token attribute from the landing page.
pub fn login_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(&LOGIN_TOKEN).next()?;
    element.value().attr("token").map(str::to_string)
}

/// Extract the category links from the catalog index page.
///
/// The index renders the same tag link in several contexts; duplicates are
/// dropped by URL, first occurrence wins.
pub fn tag_index(html: &str, base: &Url) -> Vec<Tag> {
    let document = Html::parse_document(html);
    let mut tags: Vec<Tag> = Vec::new();

    for element in document.select(&TAG_LINKS) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href) else {
            continue;
        };
        let url = url.to_string();
        if tags.iter().any(|t| t.url == url) {
            continue;
        }
        tags.push(Tag {
            name: link_text(&element),
            url,
        });
    }

    tags
}

/// Extract every lesson-like href from a tag page, absolute-ized.
pub fn lesson_links(html: &str, base: &Url) -> Vec<String> {
    collect_hrefs(html, &LESSON_LINKS, base)
}

/// Extract the episode links from a series page, absolute-ized.
pub fn series_episodes(html: &str, base: &Url) -> Vec<String> {
    collect_hrefs(html, &EPISODE_TITLES, base)
}

/// Interpret a lesson page: an optional series grouping plus the anchor
/// pointing at the actual binary download endpoint.
pub fn lesson_page(html: &str, base: &Url) -> LessonPage {
    let document = Html::parse_document(html);

    let series = document.select(&SERIES_ANCHOR).next().and_then(|element| {
        let href = element.value().attr("href")?;
        let url = base.join(href).ok()?;
        let name = link_text(&element).trim_matches(':').trim().to_string();
        let id = series_id(&url)?;
        Some(Series {
            id,
            name,
            url: url.to_string(),
        })
    });

    let download_url = document
        .select(&DOWNLOAD_ANCHOR)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| base.join(href).ok())
        .map(|url| url.to_string());

    LessonPage {
        series,
        download_url,
    }
}

/// The series slug is the path segment following `/series/`.
pub fn series_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "series" {
            return segments.next().filter(|s| !s.is_empty()).map(str::to_string);
        }
    }
    None
}

fn collect_hrefs(html: &str, selector: &Selector, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
        .collect()
}

fn link_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://courses.example.com").unwrap()
    }

    #[test]
    fn test_login_token_found() {
        let html = r#"<html><body><login-button token="abc123"></login-button></body></html>"#;
        assert_eq!(login_token(html), Some("abc123".to_string()));
    }

    #[test]
    fn test_login_token_missing() {
        assert_eq!(login_token("<html><body><login-button></login-button></body></html>"), None);
        assert_eq!(login_token("<html><body></body></html>"), None);
    }

    #[test]
    fn test_tag_index_dedup_first_seen_wins() {
        let html = r#"
            <div id="index">
                <ul>
                    <li><a href="/browse/testing"> Testing </a></li>
                    <li><a href="/browse/tooling">Tooling</a></li>
                    <li><a href="/browse/testing">Testing (featured)</a></li>
                </ul>
            </div>
        "#;
        let tags = tag_index(html, &base());
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "Testing");
        assert_eq!(tags[0].url, "https://courses.example.com/browse/testing");
        assert_eq!(tags[1].name, "Tooling");
    }

    #[test]
    fn test_lesson_links_absolute() {
        let html = r#"
            <ul class="Lesson-List">
                <li><a href="/lessons/intro">Intro</a></li>
                <li><a href="/series/alpha">Alpha</a></li>
            </ul>
        "#;
        let links = lesson_links(html, &base());
        assert_eq!(
            links,
            vec![
                "https://courses.example.com/lessons/intro",
                "https://courses.example.com/series/alpha",
            ]
        );
    }

    #[test]
    fn test_series_episodes() {
        let html = r#"
            <div class="Lesson-List__title"><a href="/series/alpha/episodes/1">One</a></div>
            <div class="Lesson-List__title"><a href="/series/alpha/episodes/2">Two</a></div>
        "#;
        let episodes = series_episodes(html, &base());
        assert_eq!(
            episodes,
            vec![
                "https://courses.example.com/series/alpha/episodes/1",
                "https://courses.example.com/series/alpha/episodes/2",
            ]
        );
    }

    #[test]
    fn test_lesson_page_with_series() {
        let html = r#"
            <div class="Video__body">
                <h2><a href="/series/alpha"> Alpha Essentials: </a></h2>
            </div>
            <a href="/downloads/42?type=lessons">Download</a>
        "#;
        let page = lesson_page(html, &base());
        let series = page.series.expect("series anchor present");
        assert_eq!(series.id, "alpha");
        assert_eq!(series.name, "Alpha Essentials");
        assert_eq!(series.url, "https://courses.example.com/series/alpha");
        assert_eq!(
            page.download_url.as_deref(),
            Some("https://courses.example.com/downloads/42?type=lessons")
        );
    }

    #[test]
    fn test_lesson_page_standalone() {
        let html = r#"<a href="/downloads/7">Download</a>"#;
        let page = lesson_page(html, &base());
        assert!(page.series.is_none());
        assert_eq!(
            page.download_url.as_deref(),
            Some("https://courses.example.com/downloads/7")
        );
    }

    #[test]
    fn test_lesson_page_without_download_anchor() {
        let page = lesson_page("<html><body><p>preview only</p></body></html>", &base());
        assert!(page.series.is_none());
        assert!(page.download_url.is_none());
    }

    #[test]
    fn test_series_id_from_url() {
        let url = Url::parse("https://courses.example.com/series/alpha").unwrap();
        assert_eq!(series_id(&url), Some("alpha".to_string()));

        let url = Url::parse("https://courses.example.com/series/alpha/episodes/3").unwrap();
        assert_eq!(series_id(&url), Some("alpha".to_string()));

        let url = Url::parse("https://courses.example.com/lessons/intro").unwrap();
        assert_eq!(series_id(&url), None);
    }
}
