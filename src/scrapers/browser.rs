use std::collections::HashSet;
use std::ffi::OsStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::{Html, Selector};
use tracing::{error, info, warn};

use crate::config::{Config, RegionTarget};
use crate::models::{ListingRecord, Mode};
use crate::scrapers::card::parse_card;

/// Desktop Chrome identity; headless Chrome's default UA advertises
/// HeadlessChrome, which the feed treats as a bot
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser-based scraper for OLX listing feeds using headless Chrome.
/// One tab is opened at launch and reused for every (region, mode) pair.
pub struct OlxBrowserScraper {
    // Keeps the Chrome process alive for the tab's lifetime
    #[allow(dead_code)]
    browser: Browser,
    tab: Arc<Tab>,
}

impl OlxBrowserScraper {
    /// Launch headless Chrome; failure here is fatal for the whole job
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let ua_arg = format!("--user-agent={USER_AGENT}");
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((1920, 1080)))
            .args(vec![OsStr::new(&ua_arg)])
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        Ok(Self { browser, tab })
    }

    /// Crawl one (region, mode) pair.
    ///
    /// Faults mid-crawl are logged and whatever was already collected is
    /// returned; a partially scraped region still contributes rows.
    pub fn scrape_region(
        &self,
        region: &RegionTarget,
        mode: Mode,
        config: &Config,
    ) -> Vec<ListingRecord> {
        let mut records = Vec::new();
        if let Err(err) = self.crawl_region(region, mode, config, &mut records) {
            error!(
                "Error scraping {}/{}: {err:#}",
                region.slug,
                mode.as_str()
            );
        }
        records
    }

    fn crawl_region(
        &self,
        region: &RegionTarget,
        mode: Mode,
        config: &Config,
        records: &mut Vec<ListingRecord>,
    ) -> Result<()> {
        let url = format!(
            "https://www.olx.co.id/{}/{}?sorting=desc-creation",
            region.slug,
            mode.category_slug()
        );
        info!("Scraping: {url}");

        self.tab.navigate_to(&url)?;
        self.tab.wait_until_navigated()?;
        thread::sleep(Duration::from_secs(4));

        let today = Local::now().date_naive();
        let mut seen_urls = HashSet::new();

        for page in 0..config.max_pages {
            if records.len() >= config.target_per_region {
                break;
            }

            // Jittered settle before reading the feed again
            thread::sleep(Duration::from_millis(fastrand::u64(2000..4000)));

            let html = page_html(&self.tab)?;
            if html.is_empty() {
                warn!("Feed page returned empty HTML");
                break;
            }

            let document = Html::parse_document(&html);
            collect_cards(
                &document,
                mode,
                region.slug,
                today,
                config.target_per_region,
                &mut seen_urls,
                records,
            );

            info!("Page {}: {} records", page + 1, records.len());

            if !self.click_load_more()? {
                break;
            }
            thread::sleep(Duration::from_secs(3));
        }

        Ok(())
    }

    /// Click the "load more" control if it is present, visible, and
    /// enabled. Returns whether a click happened.
    fn click_load_more(&self) -> Result<bool> {
        let result = self.tab.evaluate(
            r#"
            (() => {
                const btn = document.querySelector("button[data-aut-id='btnLoadMore']");
                if (btn && btn.offsetParent !== null && !btn.disabled) {
                    btn.click();
                    return true;
                }
                return false;
            })()
            "#,
            false,
        )?;

        Ok(result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}

/// Capture the rendered page HTML out of the tab
fn page_html(tab: &Arc<Tab>) -> Result<String> {
    let result = tab.evaluate("document.documentElement.outerHTML", false)?;
    Ok(result
        .value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default())
}

/// Walk every listing card in the rendered feed, parsing the ones whose
/// URL has not been seen in this run, up to the target count.
fn collect_cards(
    document: &Html,
    mode: Mode,
    region_slug: &str,
    today: NaiveDate,
    target: usize,
    seen_urls: &mut HashSet<String>,
    records: &mut Vec<ListingRecord>,
) {
    let card_selector = Selector::parse("a[href*='iid-']").unwrap();

    for card in document.select(&card_selector) {
        if records.len() >= target {
            break;
        }

        let url = card.value().attr("href").unwrap_or("");
        if seen_urls.contains(url) {
            continue;
        }

        if let Some(record) = parse_card(card, mode, region_slug, today) {
            seen_urls.insert(record.url.clone());
            records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(cards: &[String]) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", cards.join("")))
    }

    fn card_html(id: u32) -> String {
        format!(
            "<a href=\"https://www.olx.co.id/item/rumah-iid-{id}\"><span>Rp 500.000.000</span><span>Rumah nomor {id}</span></a>"
        )
    }

    fn collect(document: &Html, target: usize) -> Vec<ListingRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        collect_cards(
            document,
            Mode::Sale,
            "bekasi",
            today,
            target,
            &mut seen,
            &mut records,
        );
        records
    }

    #[test]
    fn duplicate_urls_are_collected_once() {
        let doc = feed(&[card_html(1), card_html(2), card_html(1)]);
        let records = collect(&doc, 50);
        assert_eq!(records.len(), 2);
        let urls: HashSet<_> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls.len(), records.len());
    }

    #[test]
    fn collection_stops_at_target() {
        let cards: Vec<String> = (0..10u32).map(card_html).collect();
        let doc = feed(&cards);
        assert_eq!(collect(&doc, 3).len(), 3);
    }

    #[test]
    fn dedup_survives_overlapping_pages() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        let page1 = feed(&[card_html(1), card_html(2)]);
        let page2 = feed(&[card_html(2), card_html(3)]);
        for page in [&page1, &page2] {
            collect_cards(page, Mode::Rent, "depok", today, 50, &mut seen, &mut records);
        }

        assert_eq!(records.len(), 3);
    }

    #[test]
    fn launch_identity_is_desktop_chrome() {
        assert!(USER_AGENT.starts_with("Mozilla/5.0 (Windows"));
        assert!(USER_AGENT.contains("Chrome/120"));
        assert!(!USER_AGENT.contains("Headless"));
    }

    #[test]
    fn navigational_links_are_skipped() {
        let doc = Html::parse_document(
            "<html><body><a href=\"https://www.olx.co.id/bekasi\">Semua iklan</a></body></html>",
        );
        assert!(collect(&doc, 50).is_empty());
    }
}
