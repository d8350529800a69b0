use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

/// Base address of the invitation API plus the HTTP client used to reach it.
#[derive(Clone, Debug)]
pub struct ApiEndpoint {
    http: Client,
    base: Url,
}

impl ApiEndpoint {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let mut base = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid api path '{path}'"))
    }
}
