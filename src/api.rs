//! HTTP client for the StockSense server endpoints.

use crate::error::ClientError;
use crate::models::{SearchResult, StockInfo, WatchlistAddRequest, WatchlistAddResponse};
use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const SEARCH_PATH: &str = "/api/stock/search";
const WATCHLIST_ADD_PATH: &str = "/api/watchlist/add";
const STOCK_INFO_PATH: &str = "/api/stock/info";

const USER_AGENT: &str = concat!("stocksense/", env!("CARGO_PKG_VERSION"));

/// The server operations the client consumes.
///
/// The UI only talks to this trait so controllers can be driven by an
/// in-memory double in tests.
pub trait StockApi: Send + Sync + 'static {
    /// `GET /api/stock/search?query=<query>`
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, ClientError>> + Send;

    /// `POST /api/watchlist/add`
    fn add_to_watchlist(
        &self,
        request: &WatchlistAddRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `GET /api/stock/info?symbol=<symbol>`
    fn stock_info(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<StockInfo, ClientError>> + Send;
}

/// reqwest-backed client for a StockSense server.
#[derive(Clone)]
pub struct StockSenseClient {
    client: Client,
    base_url: String,
}

impl StockSenseClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str, timeout_secs: u64, session_cookie: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie).context("Invalid session cookie value")?;
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the search endpoint for `query`.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}{}?query={}",
            self.base_url,
            SEARCH_PATH,
            urlencoding::encode(query)
        )
    }

    /// Full URL of a path on the server.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl StockApi for StockSenseClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        let url = self.search_url(query);
        debug!(%url, "searching");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, query, "search failed");
            return Err(ClientError::Status(status));
        }

        let body = response.bytes().await?;
        let results: Vec<SearchResult> = serde_json::from_slice(&body)?;
        debug!(query, count = results.len(), "search complete");
        Ok(results)
    }

    async fn add_to_watchlist(&self, request: &WatchlistAddRequest) -> Result<(), ClientError> {
        let url = self.url_for(WATCHLIST_ADD_PATH);
        debug!(%url, symbol = %request.symbol, "adding to watchlist");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, symbol = %request.symbol, "watchlist add failed");
            return Err(ClientError::Status(status));
        }

        let body = response.bytes().await?;
        let reply: WatchlistAddResponse = serde_json::from_slice(&body)?;
        if reply.success {
            Ok(())
        } else {
            Err(ClientError::Rejected(reply.error.or(reply.message)))
        }
    }

    async fn stock_info(&self, symbol: &str) -> Result<StockInfo, ClientError> {
        let url = format!(
            "{}?symbol={}",
            self.url_for(STOCK_INFO_PATH),
            urlencoding::encode(symbol)
        );
        debug!(%url, "fetching stock info");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Status(status));
        }

        let as_of = response
            .headers()
            .get(header::DATE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        let mut info: StockInfo = serde_json::from_slice(&body)?;
        if let Some(error) = info.error.take() {
            return Err(ClientError::Rejected(Some(error)));
        }
        info.as_of = as_of;
        Ok(info)
    }
}
