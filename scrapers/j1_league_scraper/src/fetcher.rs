use reqwest::blocking::Client;
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use crate::{
    config::ScrapingConfig,
    error::ScrapeError,
    types::{Season, TableKind},
};

/// Raw response of a page fetch. Non-200 statuses are returned, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub trait HtmlFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError>;
}

pub struct WebHtmlFetcher {
    client: Client,
}

impl WebHtmlFetcher {
    pub fn new(config: &ScrapingConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl HtmlFetcher for WebHtmlFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchedPage { status, body })
    }
}

/// Serves pages previously saved by the `download` command.
///
/// Pages live at `{dir}/{kind}_{season}.html`. The URL passed to [`HtmlFetcher::fetch`]
/// is ignored; callers go through [`DirectoryFetcher::page_for`].
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_name(kind: TableKind, season: Season) -> String {
        format!("{}_{}.html", kind.slug(), season)
    }

    pub fn path_for(&self, kind: TableKind, season: Season) -> PathBuf {
        self.dir.join(Self::file_name(kind, season))
    }

    pub fn page_for(&self, kind: TableKind, season: Season) -> Result<FetchedPage, ScrapeError> {
        let path = self.path_for(kind, season);
        if !path.exists() {
            debug!("No saved page at {:?}", path);
            return Ok(FetchedPage {
                status: 404,
                body: String::new(),
            });
        }
        let body = fs::read_to_string(&path)?;
        Ok(FetchedPage { status: 200, body })
    }
}

/// Source of season pages keyed by table kind and season rather than URL.
pub trait PageSource {
    fn page(&self, kind: TableKind, season: Season, url: &str) -> Result<FetchedPage, ScrapeError>;
}

impl<F: HtmlFetcher> PageSource for F {
    fn page(&self, _kind: TableKind, _season: Season, url: &str) -> Result<FetchedPage, ScrapeError> {
        self.fetch(url)
    }
}

impl PageSource for DirectoryFetcher {
    fn page(&self, kind: TableKind, season: Season, _url: &str) -> Result<FetchedPage, ScrapeError> {
        self.page_for(kind, season)
    }
}
