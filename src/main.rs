mod config;
mod models;
mod scrapers;
mod storage;

use std::time::Duration;

use config::{Config, REGIONS};
use models::Mode;
use scrapers::OlxBrowserScraper;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Properti Scout - OLX Property Scraper Job");
    info!("==========================================");

    let config = Config::from_env();
    info!(
        "Targets: {} regions x {} modes, {} records each, max {} pages",
        REGIONS.len(),
        Mode::ALL.len(),
        config.target_per_region,
        config.max_pages
    );

    // The browser session is the one setup fault that aborts the job
    let scraper = OlxBrowserScraper::new()?;

    let mut all_records = Vec::new();

    for region in REGIONS {
        for mode in Mode::ALL {
            info!("--- {} ({}) ---", region.name, mode.as_str());
            let records = scraper.scrape_region(region, mode, &config);
            info!("Collected {} records", records.len());
            all_records.extend(records);

            // Random delay between region/mode pairs
            tokio::time::sleep(Duration::from_millis(fastrand::u64(5000..10000))).await;
        }
    }

    // Release the Chrome session before the persistence phase
    drop(scraper);

    info!("Total records collected: {}", all_records.len());

    if !all_records.is_empty() {
        match storage::select_backend(&config) {
            Some(store) => {
                let saved = storage::save_records(store.as_ref(), &all_records).await;
                info!("Records saved/updated in database: {saved}");
            }
            None => error!("Skipping persistence phase; scraped data is discarded"),
        }
    }

    info!("Scraper job completed");

    Ok(())
}
