//! Fetching pages for parse_desc_meetings.rs.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use reqwest::Client;
use tempfile::NamedTempFile;
use tracing::info;

/// Something that can get the body of a URL. The crawl only ever has one fetch outstanding.
pub trait Fetcher {
    fn fetch(&self,url:&str) -> impl Future<Output=anyhow::Result<Vec<u8>>>;
}

/// Fetch over HTTP with a fixed user agent.
pub struct HttpFetcher {
    client : Client,
}

impl HttpFetcher {
    pub fn new(user_agent:&str) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(HttpFetcher{ client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self,url:&str) -> anyhow::Result<Vec<u8>> {
        info!("Downloading {}",url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content = response.bytes().await?;
        Ok(content.to_vec())
    }
}

/// Download from a URL to a temporary file in `temp_dir`.
pub(crate) async fn download_to_file<F:Fetcher>(fetcher:&F,url:&str,temp_dir:&Path) -> anyhow::Result<NamedTempFile> {
    std::fs::create_dir_all(temp_dir)?;
    let mut file = NamedTempFile::new_in(temp_dir)?;
    let content = fetcher.fetch(url).await?;
    file.write_all(&content)?;
    file.flush()?;
    Ok(file)
}

/// Resolve `url` against the page it was found on.
pub fn relative_url(base_url:&str,url:&str) -> anyhow::Result<String> {
    let base = url::Url::parse(base_url)?;
    let res = base.join(url)?;
    Ok(res.to_string())
}
