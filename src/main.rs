use std::env;

use anyhow::Result;
use chrono::Utc;
use log::info;

use da_calendar::fetch::HttpClient;
use da_calendar::output;
use da_calendar::pipeline::{build_document, months};
use da_calendar::site::SiteConfig;

mod cli;

fn setup_logging(verbose: bool) {
    if env::var("LOG").is_err() {
        let level = if verbose { "debug" } else { "info" };
        env::set_var("LOG", format!("da_calendar={level}"));
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());
    setup_logging(args.verbose);

    let today = Utc::now().date_naive();
    let site = SiteConfig::from_env(args.calendar_id);
    let client = HttpClient::new(site.clone(), args.timeout)?;

    info!("Scraping calendar {} of {}", site.calendar_id, site.domain);

    let document = build_document(&client, &site, months(args.start.unwrap_or(today), today)).await?;
    let rendered = output::render(&document, args.format)?;
    output::write(&rendered, &args.output)?;

    Ok(())
}
