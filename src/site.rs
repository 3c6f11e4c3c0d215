use std::env;

use url::Url;

pub const DEFAULT_DOMAIN: &str = "daily-adventures.cz";
pub const DEFAULT_CALENDAR_ID: u32 = 12100;

const DOMAIN_VAR: &str = "DA_CALENDAR_DOMAIN";

/// Identity of the site whose calendar widget is scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub domain: String,
    pub ajax_url: String,
    pub referer: String,
    pub calendar_id: u32,
}

impl SiteConfig {
    pub fn new(domain: impl Into<String>, calendar_id: u32) -> Self {
        let domain = domain.into();
        Self {
            ajax_url: format!("https://{domain}/wp-admin/admin-ajax.php"),
            referer: format!("https://{domain}/kalendar-akci-a-kurzu/"),
            domain,
            calendar_id,
        }
    }

    /// Defaults, with the domain taken from `DA_CALENDAR_DOMAIN` when set.
    pub fn from_env(calendar_id: u32) -> Self {
        let domain = env::var(DOMAIN_VAR).unwrap_or_else(|_| DEFAULT_DOMAIN.to_string());
        Self::new(domain, calendar_id)
    }

    pub fn origin(&self) -> String {
        format!("https://{}", self.domain)
    }

    /// Whether `url` points at this site or one of its subdomains.
    pub fn is_own_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };

        let host = host.trim_end_matches('.');
        host.eq_ignore_ascii_case(&self.domain)
            || host
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", self.domain.to_ascii_lowercase()))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN, DEFAULT_CALENDAR_ID)
    }
}
