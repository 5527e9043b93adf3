use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::PrepConfig;
use crate::corpus::ArticleRow;

/// Per-request failure taxonomy. `NotOk` is the only variant the batch loop
/// recovers from; transport and decode errors abort the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned status {status}")]
    NotOk { url: String, status: StatusCode },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// One content group as returned by the paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRecord {
    pub slug: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleHeader {
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    text: String,
    grade_level: f64,
    lexile_level: f64,
}

/// Parse one listing page (a JSON array of groups). An empty array marks the
/// end of pagination.
pub fn parse_group_page(body: &str) -> Result<Vec<GroupRecord>, serde_json::Error> {
    serde_json::from_str(body)
}

/// Parse a group response's `articles` field, stamping every row with the
/// originating slug. `grade_level` arrives as a JSON number like `5.0` and is
/// truncated to an integer label.
pub fn parse_articles(body: &str, slug: &str) -> Result<Vec<ArticleRow>, serde_json::Error> {
    let header: ArticleHeader = serde_json::from_str(body)?;
    Ok(header
        .articles
        .into_iter()
        .map(|a| ArticleRow {
            slug: slug.to_string(),
            text: a.text,
            grade: a.grade_level as i64,
            lexile: a.lexile_level,
        })
        .collect())
}

/// Blocking client for the article-header API. All calls carry the configured
/// browser-like user agent; success is exactly HTTP 200.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &PrepConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        let http = Client::builder().default_headers(headers).build()?;
        Ok(ApiClient {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn get(&self, part: &str) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, part);
        let resp = self.http.get(&url).send()?;
        if resp.status() != StatusCode::OK {
            return Err(FetchError::NotOk {
                url,
                status: resp.status(),
            });
        }
        Ok(resp.text()?)
    }

    /// Walk `?page=1..` sequentially until the first empty page, concatenating
    /// groups in encounter order. A non-200 on any page is fatal here, unlike
    /// the per-group fetches.
    pub fn fetch_groups(&self, limit: Option<usize>) -> Result<Vec<GroupRecord>> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] page {pos}, {msg} groups")?,
        );

        let mut groups = Vec::new();
        let mut pages = 0usize;
        for page in 1usize.. {
            let body = self.get(&format!("?page={}", page))?;
            let page_groups = parse_group_page(&body).map_err(|e| FetchError::Decode {
                url: format!("{}?page={}", self.base_url, page),
                source: e,
            })?;
            if page_groups.is_empty() {
                break;
            }
            groups.extend(page_groups);
            pages = page;
            pb.inc(1);
            pb.set_message(groups.len().to_string());

            if let Some(n) = limit {
                if groups.len() >= n {
                    groups.truncate(n);
                    break;
                }
            }
        }
        pb.finish_and_clear();

        info!("Fetched {} groups over {} pages", groups.len(), pages);
        Ok(groups)
    }

    /// Fetch all article variants of one group.
    pub fn fetch_articles(&self, slug: &str) -> Result<Vec<ArticleRow>, FetchError> {
        let body = self.get(slug)?;
        parse_articles(&body, slug).map_err(|e| FetchError::Decode {
            url: format!("{}{}", self.base_url, slug),
            source: e,
        })
    }
}
