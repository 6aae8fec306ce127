use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::models::{ListingRecord, Mode};
use crate::scrapers::fields::{extract_digits, parse_amount, parse_relative_date};

/// Displayed price: currency prefix, digits with separators, optional unit word
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Rp\s*[0-9.,]+(?:\s*[A-Za-z]+)?)").unwrap());

/// Combined bedroom/bathroom/area summary, e.g. "3 KT - 2 KM - 90 m2"
static SPECS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*KT\s*-\s*(\d+)\s*KM\s*-\s*(\d+)\s*m2").unwrap());

const TITLE_MAX_CHARS: usize = 200;

/// Parse one listing card into a record.
///
/// Returns None only when the card fails structural validation: no
/// listing-id marker in its link, or no visible text. Every optional
/// sub-field degrades to an empty/absent value instead.
pub fn parse_card(
    card: ElementRef,
    mode: Mode,
    region_slug: &str,
    today: NaiveDate,
) -> Option<ListingRecord> {
    let href = card.value().attr("href").unwrap_or("");
    if !href.contains("iid-") {
        return None;
    }

    // Flatten the card text: nodes joined with spaces, whitespace collapsed
    let text = card
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return None;
    }

    let price_match = PRICE_RE.find(&text);
    let price_text = price_match
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    // The triple is all-or-nothing; a capture that fails to parse (e.g.
    // an overflowing area) drops the whole summary
    let specs_match = SPECS_RE.captures(&text);
    let specs = specs_match.as_ref().and_then(|caps| {
        match (
            extract_digits(&caps[1]),
            extract_digits(&caps[2]),
            extract_digits(&caps[3]),
        ) {
            (Some(kt), Some(km), Some(m2)) => Some((kt, km, m2)),
            _ => None,
        }
    });
    let (bedrooms, bathrooms, building_area_m2) = match specs {
        Some((kt, km, m2)) => (Some(kt), Some(km), Some(m2)),
        None => (None, None, None),
    };

    let location = descendant_text(card, "span[data-aut-id='item-location']");

    let posting_date = {
        let raw = descendant_text(card, "span._2jcGx");
        if raw.is_empty() {
            String::new()
        } else {
            parse_relative_date(&raw, today)
        }
    };

    let image_url = descendant_attr(card, "img", "src");

    // Title is whatever follows the specs summary, else the price, else
    // the whole card text
    let tail = if let Some(caps) = &specs_match {
        text[caps.get(0).map(|m| m.end()).unwrap_or(0)..].trim()
    } else if let Some(m) = &price_match {
        text[m.end()..].trim()
    } else {
        text.as_str()
    };
    let title = if tail.is_empty() {
        truncate_chars(&text, TITLE_MAX_CHARS)
    } else {
        truncate_chars(tail, TITLE_MAX_CHARS)
    };

    Some(ListingRecord {
        title,
        url: href.to_string(),
        price_numeric: parse_amount(&price_text),
        price_text,
        bedrooms,
        bathrooms,
        building_area_m2,
        location,
        posting_date,
        image_url,
        mode,
        region_slug: region_slug.to_string(),
    })
}

fn descendant_text(card: ElementRef, selector: &str) -> String {
    let sel = Selector::parse(selector).unwrap();
    card.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn descendant_attr(card: ElementRef, selector: &str, attr: &str) -> String {
    let sel = Selector::parse(selector).unwrap();
    card.select(&sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .unwrap_or_default()
        .to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
