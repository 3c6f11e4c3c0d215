use std::collections::HashMap;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::fetch::DetailPageFetcher;
use crate::site::SiteConfig;

static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:počet\s+dní|number\s+of\s+days)\s*:\s*(\d+)\s*(?:den|dny|dní|dni|days|day)\b",
    )
    .unwrap()
});

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Resolved durations by detail page URL. `None` records a failed lookup.
pub type DurationCache = HashMap<String, Option<u32>>;

/// Finds the "number of days" field in a detail page's text.
#[derive(Debug, Clone)]
pub struct DurationPattern(Regex);

impl DurationPattern {
    /// `regex` must capture the day count in its first group.
    pub fn new(regex: Regex) -> Self {
        Self(regex)
    }

    pub fn find(&self, text: &str) -> Option<u32> {
        let days = self.0.captures(text)?.get(1)?.as_str().parse::<u32>().ok()?;
        (days > 0).then_some(days)
    }
}

impl Default for DurationPattern {
    fn default() -> Self {
        Self((*DEFAULT_PATTERN).clone())
    }
}

/// Text a reader would see on the page, whitespace collapsed.
pub fn visible_text(html: &Html) -> String {
    let mut words = Vec::new();

    for node in html.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|element| HIDDEN_ELEMENTS.contains(&element.value().name()));

        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Looks up an event's actual length on its detail page.
///
/// Every URL is fetched at most once per resolver; failures are remembered
/// as unknown and never retried.
pub struct DurationResolver<'a, F> {
    fetcher: &'a F,
    site: &'a SiteConfig,
    pattern: DurationPattern,
    cache: DurationCache,
}

impl<'a, F: DetailPageFetcher> DurationResolver<'a, F> {
    pub fn new(fetcher: &'a F, site: &'a SiteConfig) -> Self {
        Self::with_pattern(fetcher, site, DurationPattern::default())
    }

    pub fn with_pattern(fetcher: &'a F, site: &'a SiteConfig, pattern: DurationPattern) -> Self {
        Self {
            fetcher,
            site,
            pattern,
            cache: DurationCache::new(),
        }
    }

    pub fn cache(&self) -> &DurationCache {
        &self.cache
    }

    pub async fn resolve(&mut self, url: Option<&str>) -> Option<u32> {
        let url = url?;
        if !self.site.is_own_url(url) {
            return None;
        }

        if let Some(days) = self.cache.get(url) {
            debug!("Duration of {url} cached: {days:?}");
            return *days;
        }

        let days = self.lookup(url).await;
        self.cache.insert(url.to_string(), days);
        days
    }

    async fn lookup(&self, url: &str) -> Option<u32> {
        debug!("Looking up duration of {url}");

        let body = match self.fetcher.fetch_detail_page(url).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Failed to retrieve {url}: {err}");
                return None;
            }
        };

        let text = visible_text(&Html::parse_document(&body));
        let days = self.pattern.find(&text);
        if days.is_none() {
            debug!("No number of days found on {url}");
        }

        days
    }
}
