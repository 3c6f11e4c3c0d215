use std::future::Future;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::Deserialize;

use crate::error::FetchError;
use crate::site::SiteConfig;

const DRAW_GRID_ACTION: &str = "simcal_default_calendar_draw_grid";

/// Source of a month's calendar grid markup.
pub trait MonthGridFetcher {
    fn fetch_month_grid(
        &self,
        month: NaiveDate,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Source of an event's detail page.
pub trait DetailPageFetcher {
    fn fetch_detail_page(&self, url: &str)
        -> impl Future<Output = Result<String, FetchError>> + Send;
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GridResponse {
    success: bool,
    data: String,
}

/// Talks to the site's WordPress AJAX endpoint and detail pages.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    site: SiteConfig,
}

impl HttpClient {
    pub fn new(site: SiteConfig, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, site })
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }
}

impl MonthGridFetcher for HttpClient {
    async fn fetch_month_grid(&self, month: NaiveDate) -> Result<String, FetchError> {
        let form = [
            ("action", DRAW_GRID_ACTION.to_string()),
            ("year", month.year().to_string()),
            ("month", month.month().to_string()),
            ("id", self.site.calendar_id.to_string()),
        ];

        debug!("POST {} data: {form:?}", self.site.ajax_url);

        let resp = self
            .client
            .post(&self.site.ajax_url)
            .header("accept", "application/json, text/javascript, */*; q=0.01")
            .header("origin", self.site.origin())
            .header("referer", &self.site.referer)
            .header("x-requested-with", "XMLHttpRequest")
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = resp.text().await?;
        debug!("Response: {} bytes", body.len());

        let grid: GridResponse = serde_json::from_str(&body)?;
        if !grid.success {
            return Err(FetchError::Envelope("`success` is false".into()));
        }

        Ok(grid.data)
    }
}

impl DetailPageFetcher for HttpClient {
    async fn fetch_detail_page(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {url}");

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(resp.text().await?)
    }
}
