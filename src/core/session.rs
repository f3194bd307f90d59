//! Shared authenticated HTTP session
//!
//! One `reqwest::Client` bound to a fresh cookie store and a fixed base
//! origin. Every component issues its requests through a clone of this
//! session, so the cookie obtained at login rides along on later requests.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};
use url::Url;

use crate::core::error::{Error, Result};

/// HTTP session shared by the crawler, the authenticator and the
/// download engine. Cloning is cheap and clones share the cookie store.
#[derive(Clone)]
pub struct Session {
    client: Client,
    base: Url,
}

impl Session {
    /// Create a session against the given base origin with an empty
    /// cookie store.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let client = ClientBuilder::new()
            .cookie_store(true)
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(format!("course-dl/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    /// The base origin this session is bound to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve an href (absolute or site-relative) against the base origin.
    pub fn join(&self, href: &str) -> Result<Url> {
        self.base.join(href).map_err(Into::into)
    }

    /// GET a page and return its body text. Anything but 200 is an error.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let response = self.get_raw(url).await?;
        response.text().await.map_err(Into::into)
    }

    /// GET a URL and return the 200-checked response for streaming.
    pub async fn get_raw(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        check_status(url, &response)?;
        Ok(response)
    }

    /// POST a URL-encoded form to a site-relative path. Anything but 200
    /// is an error.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Response> {
        let url = self.join(path)?;
        let response = self.client.post(url.clone()).form(form).send().await?;
        check_status(url.as_str(), &response)?;
        Ok(response)
    }
}

fn check_status(url: &str, response: &Response) -> Result<()> {
    let status = response.status().as_u16();
    if status != 200 {
        return Err(Error::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}
