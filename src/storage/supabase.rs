use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::models::ListingRecord;
use crate::storage::PropertyStore;

/// Upserts batches through the Supabase REST endpoint for the
/// `properties` table. Duplicate URLs are merged server-side.
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/properties", base_url.trim_end_matches('/')),
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl PropertyStore for SupabaseStore {
    async fn write_batch(&self, records: &[ListingRecord]) -> Result<u64> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(records)
            .send()
            .await
            .context("Supabase request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Supabase returned {status}: {body}");
        }

        Ok(records.len() as u64)
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_normalized() {
        let store = SupabaseStore::new("https://project.supabase.co/", "key").unwrap();
        assert_eq!(store.endpoint, "https://project.supabase.co/rest/v1/properties");
    }
}
