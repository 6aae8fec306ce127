pub mod browser;
pub mod card;
pub mod fields;

pub use browser::OlxBrowserScraper;
